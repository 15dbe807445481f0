pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod service;

pub use detection::DetectionParams;
pub use error::{ErrorKind, ProcessingError};
pub use models::{Annotation, AnnotationType, Contour, EdgeMap, ProcessingResult};
pub use pipeline::{DebugConfig, Pipeline, PipelineContext, StageOutputs};

/// Run the full pipeline with default parameters.
pub fn process(image_bytes: &[u8]) -> Result<ProcessingResult, ProcessingError> {
    Pipeline::default().process(image_bytes)
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` for verbose runs and `info` else.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
