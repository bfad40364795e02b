//! HTTP span helpers.

/// Collections whose next path segment is a record slug.
const SLUG_COLLECTIONS: [&str; 2] = ["categories", "products"];

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Replace record slugs with `{slug}` so routes have bounded cardinality.
fn normalise_path_for_span_name(path: &str) -> String {
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() {
        return "/".to_owned();
    }

    let mut normalised = String::new();
    let mut previous: Option<&str> = None;

    for segment in trimmed.split('/') {
        normalised.push('/');

        if previous.is_some_and(|p| SLUG_COLLECTIONS.contains(&p)) {
            normalised.push_str("{slug}");
        } else {
            normalised.push_str(segment);
        }

        previous = Some(segment);
    }

    normalised
}
