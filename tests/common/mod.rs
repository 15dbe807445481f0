mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from edgemark for tests
pub use edgemark::service::{
    EventHandler, LocalObjectStore, MemoryObjectStore, ObjectLocation, ObjectSink, ObjectSource,
    PublicUrl, Response, ResponseBody, ServiceConfig,
};
pub use edgemark::{
    Annotation, Contour, DetectionParams, EdgeMap, ErrorKind, Pipeline, ProcessingError,
};
