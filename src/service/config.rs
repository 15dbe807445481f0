use crate::service::storage::PublicUrl;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const INCOMING_SEGMENT: &str = "uploads/";
pub const PROCESSED_SEGMENT: &str = "processed/";

/// Settings for the invocation layer around the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Bucket used when a direct invocation does not name one.
    pub default_bucket: Option<String>,
    pub region: String,
    /// Public endpoint override (e.g. a local S3 emulator).
    pub endpoint: Option<String>,
    pub incoming_segment: String,
    pub processed_segment: String,
}

impl ServiceConfig {
    /// Read `S3_BUCKET`, `AWS_REGION` and `AWS_ENDPOINT`; empty values count as unset.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            default_bucket: var("S3_BUCKET"),
            region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: var("AWS_ENDPOINT"),
            ..Self::default()
        }
    }

    pub fn public_url(&self) -> PublicUrl {
        PublicUrl {
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
        }
    }

    /// Derive where the processed output of `key` is stored.
    ///
    /// Every incoming segment is swapped for the processed one. Keys without an
    /// incoming segment get the processed segment prefixed so the source is never
    /// overwritten.
    pub fn processed_key(&self, key: &str) -> String {
        if key.contains(&self.incoming_segment) {
            key.replace(&self.incoming_segment, &self.processed_segment)
        } else {
            format!("{}{}", self.processed_segment, key.trim_start_matches('/'))
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_bucket: None,
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            incoming_segment: INCOMING_SEGMENT.to_string(),
            processed_segment: PROCESSED_SEGMENT.to_string(),
        }
    }
}
