pub mod config;
pub mod event;
pub mod response;
pub mod storage;

use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

pub use config::ServiceConfig;
pub use event::{DirectInvocation, InvocationTarget, TriggerEvent};
pub use response::{Response, ResponseBody, SuccessBody};
pub use storage::{LocalObjectStore, MemoryObjectStore, ObjectLocation, ObjectSink, ObjectSource, PublicUrl};

use crate::error::ProcessingError;
use crate::pipeline::Pipeline;
use response::SUCCESS_MESSAGE;

/// Glue between a trigger payload, the object store and the processing core.
#[derive(Debug)]
pub struct EventHandler<S> {
    store: S,
    config: ServiceConfig,
    pipeline: Pipeline,
}

impl<S> EventHandler<S>
where
    S: ObjectSource + ObjectSink,
{
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            store,
            config,
            pipeline: Pipeline::default(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Handle one trigger payload. Failures are folded into the envelope.
    pub async fn handle(&self, payload: &serde_json::Value) -> Response {
        let span = info_span!("invocation", id = %Uuid::new_v4());

        async {
            debug!(event = %payload, "received event");
            match self.try_handle(payload).await {
                Ok(response) => {
                    info!("Processing completed successfully");
                    response
                }
                Err(e) => {
                    error!(kind = %e.kind(), "Error processing image: {}", e);
                    Response::failure(&e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_handle(&self, payload: &serde_json::Value) -> Result<Response, ProcessingError> {
        let target = TriggerEvent::from_value(payload)?
            .resolve(self.config.default_bucket.as_deref())?;
        info!(
            bucket = %target.location.bucket,
            key = %target.location.key,
            "Processing image"
        );

        let image_bytes = self
            .store
            .fetch(&target.location)
            .await
            .map_err(|e| ProcessingError::storage(&e))?;

        let result = self.pipeline.process(&image_bytes)?;

        let processed = ObjectLocation {
            bucket: target.location.bucket.clone(),
            key: self.config.processed_key(&target.location.key),
        };
        let processed_url = self
            .store
            .store(&processed, result.image, "image/jpeg")
            .await
            .map_err(|e| ProcessingError::storage(&e))?;

        Ok(Response::success(SuccessBody {
            image_id: target.correlation_id,
            original_key: target.location.key,
            processed_key: processed.key,
            processed_url,
            annotations: result.annotations,
            message: SUCCESS_MESSAGE.to_string(),
        }))
    }
}
