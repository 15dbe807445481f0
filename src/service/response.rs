use serde::Serialize;

use crate::error::{ErrorKind, ProcessingError};
use crate::models::Annotation;

pub const SUCCESS_MESSAGE: &str = "Image processed successfully";
pub const FAILURE_MESSAGE: &str = "Image processing failed";

/// Transport envelope returned to whoever triggered the invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success(SuccessBody),
    Failure(FailureBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody {
    pub image_id: Option<String>,
    pub original_key: String,
    pub processed_key: String,
    pub processed_url: String,
    pub annotations: Vec<Annotation>,
    pub message: String,
}

/// Only the kind and message of the error are exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    pub error: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl Response {
    pub fn success(body: SuccessBody) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Success(body),
        }
    }

    pub fn failure(err: &ProcessingError) -> Self {
        Self {
            status_code: 500,
            body: ResponseBody::Failure(FailureBody {
                error: err.to_string(),
                kind: err.kind(),
                message: FAILURE_MESSAGE.to_string(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, ResponseBody::Success(_))
    }
}
