//! URL slugs for categories and products.
//!
//! Slugs are derived from names by [`slugify`] and made unique by probing
//! `base`, `base-1`, `base-2`, ... against the rows already stored.

use rustc_hash::FxHashSet;
use thiserror::Error;

mod repository;

pub(crate) use repository::PgSlugsRepository;

/// Number of candidates tried (`base`, then `base-1` to `base-999`) before giving up.
pub const MAX_SLUG_PROBES: u32 = 1000;

/// Width of the longest suffix ("-999") a probe can append.
const MAX_SUFFIX_LEN: usize = 4;

/// Which table a slug belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugKind {
    Category,
    Product,
}

impl SlugKind {
    /// Column width of the slug.
    #[must_use]
    pub const fn max_len(self) -> usize {
        match self {
            Self::Category => 120,
            Self::Product => 280,
        }
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
        }
    }
}

#[derive(Debug, Error)]
pub enum SlugError {
    /// The name has no characters a slug can be built from.
    #[error("cannot derive a slug from the given name")]
    Empty,

    /// An explicit slug contains disallowed characters or is too long.
    #[error("{0}")]
    Invalid(String),

    /// An explicit slug is already used by another row.
    #[error("slug already used by another {0:?}")]
    Taken(SlugKind),

    /// Every probe up to [`MAX_SLUG_PROBES`] collided.
    #[error("no free slug left for the given name")]
    Exhausted,

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

impl SlugError {
    /// User-facing message for the field the slug came from.
    #[must_use]
    pub fn field_message(&self) -> String {
        match self {
            Self::Empty => "Could not generate a slug from this value.".to_owned(),
            Self::Invalid(message) => message.clone(),
            Self::Taken(kind) => format!("A {} with this slug already exists.", kind.noun()),
            Self::Exhausted => "Could not generate a unique slug for this value.".to_owned(),
            Self::Sql(_) => "Storage error.".to_owned(),
        }
    }
}

/// Lowercase ASCII slug of `value`.
///
/// Letters and digits are kept, common Latin accents are folded to their base
/// letter, and every other run of characters becomes a single hyphen.
/// Leading and trailing hyphens are dropped.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for ch in value.chars() {
        let folded = if ch.is_ascii_alphanumeric() {
            Some(Folded::Char(ch.to_ascii_lowercase()))
        } else {
            fold_latin(ch).map(Folded::Str)
        };

        match folded {
            Some(folded) => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }

                pending_hyphen = false;

                match folded {
                    Folded::Char(ch) => slug.push(ch),
                    Folded::Str(s) => slug.push_str(s),
                }
            }
            None => pending_hyphen = true,
        }
    }

    slug
}

enum Folded {
    Char(char),
    Str(&'static str),
}

fn fold_latin(ch: char) -> Option<&'static str> {
    let folded = match ch.to_lowercase().next()? {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' => "s",
        'ß' => "ss",
        'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };

    Some(folded)
}

/// Trim a caller-supplied slug, treating a blank one as absent.
#[must_use]
pub fn explicit_slug(slug: Option<String>) -> Option<String> {
    slug.map(|slug| slug.trim().to_owned())
        .filter(|slug| !slug.is_empty())
}

/// Check the format of a caller-supplied slug.
///
/// # Errors
///
/// Returns [`SlugError::Invalid`] when the slug is too long or holds anything
/// other than ASCII letters, digits, underscores and hyphens.
pub fn validate_explicit_slug(slug: &str, kind: SlugKind) -> Result<(), SlugError> {
    if slug.len() > kind.max_len() {
        return Err(SlugError::Invalid(format!(
            "Ensure this field has no more than {} characters.",
            kind.max_len()
        )));
    }

    if !slug
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(SlugError::Invalid(
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
                .to_owned(),
        ));
    }

    Ok(())
}

/// `base` with the numbered suffix `n` appended, shortening `base` so the
/// result fits in `max_len`. Suffix `0` means no suffix.
#[must_use]
pub fn with_suffix(base: &str, n: u32, max_len: usize) -> String {
    let suffix = if n == 0 { String::new() } else { format!("-{n}") };
    let keep = max_len.saturating_sub(suffix.len());

    let mut candidate: String = base.chars().take(keep).collect();

    while candidate.ends_with('-') {
        candidate.pop();
    }

    candidate.push_str(&suffix);
    candidate
}

/// Prefix shared by every candidate [`first_available`] can produce for `base`.
#[must_use]
pub(crate) fn probe_prefix(base: &str, max_len: usize) -> String {
    let keep = max_len.saturating_sub(MAX_SUFFIX_LEN);

    let mut prefix: String = base.chars().take(keep).collect();

    while prefix.ends_with('-') {
        prefix.pop();
    }

    prefix
}

/// First candidate derived from `base` that is not in `taken`.
#[must_use]
pub fn first_available(base: &str, max_len: usize, taken: &FxHashSet<String>) -> Option<String> {
    (0..MAX_SLUG_PROBES)
        .map(|n| with_suffix(base, n, max_len))
        .find(|candidate| !taken.contains(candidate))
}

/// Escape `%`, `_` and `\` for use inside a `LIKE` pattern.
#[must_use]
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }

        escaped.push(ch);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation_and_whitespace() {
        assert_eq!(slugify("Hello,  World!"), "hello-world");
        assert_eq!(slugify("  --Widgets & Gadgets--  "), "widgets-gadgets");
        assert_eq!(slugify("Model X 2000"), "model-x-2000");
    }

    #[test]
    fn slugify_folds_accents() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn slugify_of_symbols_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn explicit_slugs_allow_underscores_and_hyphens() {
        assert!(validate_explicit_slug("summer_sale-2024", SlugKind::Product).is_ok());
        assert!(matches!(
            validate_explicit_slug("no spaces", SlugKind::Product),
            Err(SlugError::Invalid(_))
        ));
        assert!(matches!(
            validate_explicit_slug(&"a".repeat(121), SlugKind::Category),
            Err(SlugError::Invalid(_))
        ));
    }

    #[test]
    fn blank_explicit_slugs_are_absent() {
        assert_eq!(explicit_slug(Some("  ".to_owned())), None);
        assert_eq!(explicit_slug(None), None);
        assert_eq!(
            explicit_slug(Some(" sale ".to_owned())).as_deref(),
            Some("sale")
        );
    }

    #[test]
    fn suffixes_keep_candidates_within_max_len() {
        let base = "a".repeat(120);

        assert_eq!(with_suffix(&base, 0, 120).len(), 120);

        let suffixed = with_suffix(&base, 7, 120);

        assert_eq!(suffixed.len(), 120);
        assert!(suffixed.ends_with("a-7"));
    }

    #[test]
    fn truncation_never_leaves_double_hyphens() {
        assert_eq!(with_suffix("abc-def", 1, 6), "abc-1");
    }

    #[test]
    fn first_available_probes_in_order() {
        let mut taken = FxHashSet::default();

        assert_eq!(first_available("widget", 280, &taken).as_deref(), Some("widget"));

        taken.insert("widget".to_owned());
        taken.insert("widget-1".to_owned());

        assert_eq!(first_available("widget", 280, &taken).as_deref(), Some("widget-2"));
    }

    #[test]
    fn first_available_gives_up_after_max_probes() {
        let taken: FxHashSet<String> = (0..MAX_SLUG_PROBES)
            .map(|n| with_suffix("lamp", n, 120))
            .collect();

        assert_eq!(taken.len(), 1000);
        assert_eq!(first_available("lamp", 120, &taken), None);

        let mut freed = taken;
        freed.remove("lamp-999");

        assert_eq!(first_available("lamp", 120, &freed).as_deref(), Some("lamp-999"));
    }

    #[test]
    fn probe_prefix_covers_truncated_candidates() {
        let base = "b".repeat(150);
        let prefix = probe_prefix(&base, 120);

        for n in [0, 1, 99, MAX_SLUG_PROBES - 1] {
            assert!(with_suffix(&base, n, 120).starts_with(&prefix));
        }
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
