use std::collections::HashMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tokio::{fs as async_fs, sync::RwLock};

/// Bucket + key pair naming one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Supplies the raw bytes of a source image.
pub trait ObjectSource {
    fn fetch(&self, location: &ObjectLocation) -> impl Future<Output = anyhow::Result<Vec<u8>>>;
}

/// Persists processed bytes and returns a publicly reachable locator.
pub trait ObjectSink {
    fn store(
        &self,
        location: &ObjectLocation,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = anyhow::Result<String>>;
}

/// Builds public URLs for stored objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrl {
    pub endpoint: Option<String>,
    pub region: String,
}

impl PublicUrl {
    pub fn locate(&self, location: &ObjectLocation) -> String {
        match &self.endpoint {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                location.bucket,
                location.key
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                location.bucket, self.region, location.key
            ),
        }
    }
}

/// Directory-backed object store: `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    urls: PublicUrl,
}

impl LocalObjectStore {
    pub fn new<P: AsRef<Path>>(root: P, urls: PublicUrl) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            urls,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a location to a path below the root, rejecting keys that would escape it.
    pub fn object_path(&self, location: &ObjectLocation) -> anyhow::Result<PathBuf> {
        let mut path = self.root.clone();
        for part in [location.bucket.as_str(), location.key.as_str()] {
            let relative = Path::new(part);
            if part.is_empty()
                || relative
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
            {
                anyhow::bail!("Invalid object location: {}", location);
            }
            path.push(relative);
        }
        Ok(path)
    }
}

impl ObjectSource for LocalObjectStore {
    async fn fetch(&self, location: &ObjectLocation) -> anyhow::Result<Vec<u8>> {
        let path = self.object_path(location)?;
        let bytes = async_fs::read(&path)
            .await
            .with_context(|| format!("Failed to read object {:?}", path))?;
        Ok(bytes)
    }
}

impl ObjectSink for LocalObjectStore {
    async fn store(
        &self,
        location: &ObjectLocation,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> anyhow::Result<String> {
        let path = self.object_path(location)?;
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        async_fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write object {:?}", path))?;

        let url = self.urls.locate(location);
        tracing::info!("Uploaded processed image to: {}", url);
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process object store.
#[derive(Debug)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<ObjectLocation, StoredObject>>,
    urls: PublicUrl,
}

impl MemoryObjectStore {
    pub fn new(urls: PublicUrl) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            urls,
        }
    }

    pub async fn insert(&self, location: ObjectLocation, bytes: Vec<u8>, content_type: &str) {
        self.objects.write().await.insert(
            location,
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
    }

    pub async fn get(&self, location: &ObjectLocation) -> Option<StoredObject> {
        self.objects.read().await.get(location).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

impl ObjectSource for MemoryObjectStore {
    async fn fetch(&self, location: &ObjectLocation) -> anyhow::Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(location)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| anyhow::anyhow!("No such object: {}", location))
    }
}

impl ObjectSink for MemoryObjectStore {
    async fn store(
        &self,
        location: &ObjectLocation,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<String> {
        self.insert(location.clone(), bytes, content_type).await;
        Ok(self.urls.locate(location))
    }
}
