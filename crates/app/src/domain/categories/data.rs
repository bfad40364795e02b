//! Categories Data

use crate::{
    domain::slugs::explicit_slug,
    validation::{ValidationErrors, clean_required_text},
};

/// Longest category name accepted.
pub const NAME_MAX_CHARS: usize = 100;

/// New Category Data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
}

impl NewCategory {
    /// Trim and check every field.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = clean_required_text(&mut errors, "name", &self.name, NAME_MAX_CHARS);

        errors.into_result()?;

        Ok(Self {
            name,
            slug: explicit_slug(self.slug),
            description: self.description.trim().to_owned(),
        })
    }
}

/// Category Update Data
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl CategoryUpdate {
    /// Trim and check the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self
            .name
            .map(|name| clean_required_text(&mut errors, "name", &name, NAME_MAX_CHARS));

        errors.into_result()?;

        Ok(Self {
            name,
            slug: explicit_slug(self.slug),
            description: self.description.map(|d| d.trim().to_owned()),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_category_is_trimmed() -> Result<(), ValidationErrors> {
        let category = NewCategory {
            name: "  Books ".to_owned(),
            slug: Some("   ".to_owned()),
            description: " Paper things\n".to_owned(),
        }
        .validated()?;

        assert_eq!(category.name, "Books");
        assert_eq!(category.slug, None);
        assert_eq!(category.description, "Paper things");

        Ok(())
    }

    #[test]
    fn blank_or_long_names_are_rejected() {
        let blank = NewCategory {
            name: " ".to_owned(),
            ..NewCategory::default()
        }
        .validated();

        let long = CategoryUpdate {
            name: Some("x".repeat(NAME_MAX_CHARS + 1)),
            ..CategoryUpdate::default()
        }
        .validated();

        assert!(blank.is_err_and(|e| e.messages_for("name").len() == 1));
        assert!(long.is_err_and(|e| e.messages_for("name").len() == 1));
    }

    #[test]
    fn update_leaves_absent_fields_alone() -> Result<(), ValidationErrors> {
        let update = CategoryUpdate {
            description: Some(" new ".to_owned()),
            ..CategoryUpdate::default()
        }
        .validated()?;

        assert_eq!(update.name, None);
        assert_eq!(update.description.as_deref(), Some("new"));
        assert!(!update.is_empty());

        Ok(())
    }
}
