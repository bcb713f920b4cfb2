use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::body::BoxBody;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::envelope::Envelope;
use crate::validation::{FieldError, Location};

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    ValidationFailed {
        errors: Vec<FieldError>,
    },

    // 404
    PathNotFound,
    CampaignNotFound {
        campaign_id: String,
    },

    // 500
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
    InvalidConfig {
        key: &'static str,
        reason: String,
    },
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidQuery(_) => "E4001002",
            Error::ValidationFailed { .. } => "E4001003",
            Error::PathNotFound => "E4041000",
            Error::CampaignNotFound { .. } => "E4041001",
            Error::FailedDatabaseCall(_) => "E5001000",
            Error::FailedToSerializeToBson(_) => "E5001001",
            Error::IoError(_) => "E5001002",
            Error::InvalidConfig { .. } => "E5001003",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::ValidationFailed { .. } => "The request failed validation",
            Error::PathNotFound => "The requested path does not exist",
            Error::CampaignNotFound { .. } => "Campaign not found",
            Error::FailedDatabaseCall(_)
            | Error::FailedToSerializeToBson(_)
            | Error::IoError(_)
            | Error::InvalidConfig { .. } => "An error occurred",
        }
    }

    /// The field-level problems reported alongside a 400 response.
    fn field_errors(&self) -> Option<Vec<FieldError>> {
        match self {
            Error::InvalidJson(err) => Some(vec![FieldError::malformed(Location::Body, err)]),
            Error::InvalidPath(err) => Some(vec![FieldError::malformed(Location::Params, err)]),
            Error::InvalidQuery(err) => Some(vec![FieldError::malformed(Location::Query, err)]),
            Error::ValidationFailed { errors } => Some(errors.clone()),
            _ => None,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidConfig { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        let field_errors = self.field_errors();

        let mut envelope = Envelope::<()>::failure(self.error_message(), self.error_code());
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "request failed: {}", self);
            envelope.error = Some(self);
        }
        envelope.errors = field_errors.as_deref();

        envelope.respond(status)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonError> for Error {
    fn from(error: BsonError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
