use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, warn};

use crate::error::ProcessingError;
use crate::service::storage::ObjectLocation;

/// Trigger payload, resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerEvent {
    /// Storage notification carrying one record per uploaded object.
    BatchNotification {
        #[serde(rename = "Records")]
        records: Vec<EventRecord>,
    },
    DirectInvocation(DirectInvocation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// Payload sent when the backend asks for an image to be processed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectInvocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// RFC 3339 time at which processing was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl DirectInvocation {
    /// Build a payload stamped with the current UTC time.
    pub fn new(image_id: impl Into<String>, s3_key: impl Into<String>, bucket: Option<String>) -> Self {
        Self {
            bucket,
            s3_key: Some(s3_key.into()),
            image_id: Some(image_id.into()),
            timestamp: OffsetDateTime::now_utc().format(&Rfc3339).ok(),
        }
    }

    pub fn requested_at(&self) -> Option<OffsetDateTime> {
        let ts = self.timestamp.as_deref()?;
        match OffsetDateTime::parse(ts, &Rfc3339) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("Ignoring malformed timestamp {:?}: {}", ts, e);
                None
            }
        }
    }
}

/// What the core needs to know about one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationTarget {
    pub location: ObjectLocation,
    pub correlation_id: Option<String>,
}

impl TriggerEvent {
    pub fn from_value(payload: &serde_json::Value) -> Result<Self, ProcessingError> {
        TriggerEvent::deserialize(payload)
            .map_err(|e| ProcessingError::invalid_input(format!("unrecognized event payload: {}", e)))
    }

    /// Resolve to a source location. Only the first record of a batch is used.
    pub fn resolve(self, default_bucket: Option<&str>) -> Result<InvocationTarget, ProcessingError> {
        let (bucket, key, correlation_id) = match self {
            TriggerEvent::BatchNotification { records } => match records.into_iter().next() {
                Some(record) => (Some(record.s3.bucket.name), Some(record.s3.object.key), None),
                None => (None, None, None),
            },
            TriggerEvent::DirectInvocation(invocation) => {
                if let Some(requested_at) = invocation.requested_at() {
                    debug!(%requested_at, "direct invocation");
                }
                let bucket = invocation
                    .bucket
                    .filter(|b| !b.is_empty())
                    .or_else(|| default_bucket.map(str::to_string));
                (bucket, invocation.s3_key, invocation.image_id)
            }
        };

        match (bucket.filter(|b| !b.is_empty()), key.filter(|k| !k.is_empty())) {
            (Some(bucket), Some(key)) => Ok(InvocationTarget {
                location: ObjectLocation { bucket, key },
                correlation_id,
            }),
            _ => Err(ProcessingError::invalid_input("Missing bucket or key information")),
        }
    }
}
