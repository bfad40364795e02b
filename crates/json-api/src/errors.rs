//! Handler error responses.

use std::collections::BTreeMap;

use salvo::{
    oapi::{Components, EndpointOutRegister, Operation},
    prelude::*,
};

use catalog_app::validation::ValidationErrors;

/// Messages keyed by the input field they concern.
pub(crate) type FieldMessages = BTreeMap<&'static str, Vec<String>>;

/// An error a handler can return: either a plain status or field errors.
#[derive(Debug)]
pub(crate) enum ApiError {
    Status(StatusError),

    /// Rendered as a `400` with a `{ "<field>": ["<message>", ...] }` body.
    Validation(FieldMessages),
}

impl ApiError {
    pub(crate) fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(FieldMessages::from([(field, vec![message.into()])]))
    }
}

impl From<StatusError> for ApiError {
    fn from(error: StatusError) -> Self {
        Self::Status(error)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldMessages::new();

        for error in errors.iter() {
            fields
                .entry(error.field)
                .or_default()
                .push(error.message.clone());
        }

        Self::Validation(fields)
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        match self {
            Self::Status(error) => res.render(error),
            Self::Validation(fields) => {
                res.status_code(StatusCode::BAD_REQUEST);
                res.render(Json(fields));
            }
        }
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        StatusError::register(components, operation);
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn invalid() -> Result<&'static str, ApiError> {
        let mut errors = ValidationErrors::new();

        errors.add("name", "This field is required.");
        errors.add("price", "Ensure this value is greater than or equal to 0.");
        errors.add("name", "second");

        Err(errors.into())
    }

    #[tokio::test]
    async fn validation_errors_render_as_field_map() -> TestResult {
        let mut res = TestClient::get("http://example.com/")
            .send(&Service::new(Router::new().get(invalid)))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            body,
            json!({
                "name": ["This field is required.", "second"],
                "price": ["Ensure this value is greater than or equal to 0."],
            })
        );

        Ok(())
    }
}
