//! Validated request extractors
//!
//! `ValidatedJson<T>` / `ValidatedQuery<T>` deserialize the raw payload `T`
//! and run [`Validate`] on it; handlers only ever see `T::Output`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Json, Query, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::app_error::AppError;
use crate::validation::{FieldError, Validate};

/// JSON body, deserialized then validated.
#[derive(Debug)]
pub struct ValidatedJson<T: Validate>(pub T::Output);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        let output = raw.validate()?;
        Ok(Self(output))
    }
}

/// Query string, deserialized then validated.
#[derive(Debug)]
pub struct ValidatedQuery<T: Validate>(pub T::Output);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        let output = raw.validate()?;
        Ok(Self(output))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            AppError::validation(vec![FieldError::new("body", err.body_text())])
        }
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Content-Type must be application/json")
        }
        _ => AppError::bad_request("Invalid JSON format"),
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::validation(vec![FieldError::new("query", rejection.body_text())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrors;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct RawName {
        name: Option<String>,
    }

    impl Validate for RawName {
        type Output = String;

        fn validate(self) -> Result<String, ValidationErrors> {
            let mut errors = ValidationErrors::new();
            let name = self.name.map(|n| n.trim().to_string()).unwrap_or_default();
            if name.is_empty() {
                errors.add("name", "Name is required");
            }
            errors.finish(name)
        }
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_validated_json_ok() {
        let ValidatedJson(name) =
            ValidatedJson::<RawName>::from_request(json_request(r#"{"name":"  Ada "}"#), &())
                .await
                .unwrap();
        assert_eq!(name, "Ada");
    }

    #[tokio::test]
    async fn test_validated_json_reports_field_errors() {
        let err = ValidatedJson::<RawName>::from_request(json_request(r#"{"other":1}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.details()[0].field, "name");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = ValidatedJson::<RawName>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::kind::ErrorKind::BadRequest);
        assert_eq!(err.message(), "Invalid JSON format");
    }

    #[tokio::test]
    async fn test_validated_query() {
        let req = Request::builder()
            .uri("/?name=Grace")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let ValidatedQuery(name) = ValidatedQuery::<RawName>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(name, "Grace");
    }
}
