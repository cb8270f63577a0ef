use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use actix_multipart::Multipart;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::TryStreamExt;
use serde::de::DeserializeOwned;

use crate::domain::error::AppError;

const MAX_FORM_BYTES: usize = 64 * 1024;

/// Form fields read from a urlencoded or multipart body.
///
/// Any other content type, or no body at all, yields an empty form so the
/// use case reports which fields are missing.
pub struct FormFields<T>(pub T);

impl<T> FormFields<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for FormFields<T> {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let mut payload = payload.take();

        Box::pin(async move {
            let content_type = req
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_ascii_lowercase();

            let fields = if content_type.starts_with("multipart/form-data") {
                read_multipart(Multipart::new(req.headers(), payload)).await?
            } else if content_type.starts_with("application/x-www-form-urlencoded") {
                web::Form::<HashMap<String, String>>::from_request(&req, &mut payload)
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Invalid form data: {}", e)))?
                    .into_inner()
            } else {
                HashMap::new()
            };

            let value = serde_json::to_value(fields)
                .map_err(|e| AppError::Internal(format!("Failed to collect form fields: {}", e)))?;
            serde_json::from_value(value)
                .map(FormFields)
                .map_err(|e| AppError::ValidationError(format!("Invalid form data: {}", e)))
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<HashMap<String, String>, AppError> {
    let invalid = |e: actix_multipart::MultipartError| {
        AppError::ValidationError(format!("Invalid form data: {}", e))
    };

    let mut fields = HashMap::new();
    let mut total = 0usize;
    while let Some(mut field) = multipart.try_next().await.map_err(invalid)? {
        let name = field.name().map(str::to_string);
        let mut value = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(invalid)? {
            total += chunk.len();
            if total > MAX_FORM_BYTES {
                return Err(AppError::ValidationError("Form data is too large".to_string()));
            }
            value.extend_from_slice(&chunk);
        }
        if let Some(name) = name {
            fields.insert(name, String::from_utf8_lossy(&value).into_owned());
        }
    }
    Ok(fields)
}
