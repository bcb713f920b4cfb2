use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::error::Error;
use crate::validation::FieldError;

/// The shape every response body takes, successful or not.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<'a, T> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a Error>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a [FieldError]>,
    pub has_error: bool,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn success(message: &'a str, data: T) -> Envelope<'a, T> {
        Envelope {
            message,
            code: None,
            data: Some(data),
            error: None,
            errors: None,
            has_error: false,
        }
    }

    pub fn failure(message: &'a str, code: &'static str) -> Envelope<'a, T> {
        Envelope {
            message,
            code: Some(code),
            data: None,
            error: None,
            errors: None,
            has_error: true,
        }
    }

    pub fn respond(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}
