use std::path::PathBuf;

/// The chosen file could not be opened or decoded as an image.
#[derive(Debug, thiserror::Error)]
#[error("failed to open {path}: {source}")]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// A surface or image with no area. Callers skip the draw.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DegenerateCanvas {
    #[error("canvas has no drawable area ({width}x{height})")]
    Canvas { width: f32, height: f32 },
    #[error("image has no pixels")]
    EmptyImage,
}
