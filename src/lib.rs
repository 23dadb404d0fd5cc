//! Library exports for the ink segmentation and annotation engine.
/// Labeled rectangles and their label workflow.
pub mod annotation;
/// Application directory resolution.
pub mod app_dirs;
/// TOML configuration stored in the application directory.
pub mod config;
/// Connected-component ink region detection.
pub mod detection;
/// Rectangle math shared across modules.
pub mod geometry;
/// Tracing subscriber setup and log file rotation.
pub mod logging;
/// Merging detection output with existing annotations.
pub mod reconcile;
/// Annotation lifecycle coordination.
pub mod session;
/// Key/value persistence backends.
pub mod storage;
/// Frequency-ranked candidate suggestions.
pub mod suggestion;
/// Raster ink surface, strokes and sample capture.
pub mod surface;
/// Persistent pool of confirmed samples.
pub mod training;
