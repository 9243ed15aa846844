use crate::error::LoadError;
use crate::filters::{self, Filter, Histogram};
use crate::image_store::ImageStore;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Original,
    Processed,
}

/// Surfaces whose textures are stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Redraw {
    pub original: bool,
    pub processed: bool,
}

impl Redraw {
    pub fn any(&self) -> bool {
        self.original || self.processed
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterReport {
    pub filter: Filter,
    /// Share of pixels kept by the transparency mask, in `[0, 1]`.
    pub transparency: Option<f32>,
}

/// The pristine image and the processed copy shown beside it.
///
/// Filters always start from `original`, so applying one discards any
/// earlier filter or annotation. Annotations are drawn into `current` and
/// accumulate until the next filter or load.
#[derive(Default)]
pub struct Session {
    original: Option<ImageStore>,
    current: Option<ImageStore>,
    source: Option<PathBuf>,
    redraw: Redraw,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, image: ImageStore, source: Option<PathBuf>) {
        log::info!(
            "Loaded {}x{} image from {}",
            image.width(),
            image.height(),
            source
                .as_deref()
                .map_or_else(|| "memory".to_string(), |p| p.display().to_string())
        );
        self.current = Some(image.clone());
        self.original = Some(image);
        self.source = source;
        self.request_redraw(Surface::Original);
        self.request_redraw(Surface::Processed);
    }

    /// Decodes `path` and loads it. On failure the session is left as it was.
    pub fn open(&mut self, path: &Path) -> Result<[u32; 2], LoadError> {
        let image = ImageStore::from_file(path)?;
        let size = image.size();
        self.load(image, Some(path.to_path_buf()));
        Ok(size)
    }

    /// Replaces `current` with `filter` applied to `original`. Does nothing
    /// and returns `None` while no image is loaded.
    pub fn apply_filter(&mut self, filter: Filter) -> Option<FilterReport> {
        let original = self.original.as_ref()?;
        let (buffer, transparency) = match filter {
            Filter::TransparencyMask => {
                let (masked, share) = filters::transparency_mask(&original.buffer);
                (masked, Some(share))
            }
            _ => (filter.apply(&original.buffer), None),
        };
        log::debug!("Applied {} to {}x{}", filter.name(), buffer.width(), buffer.height());
        self.current = Some(ImageStore::from_buffer(buffer));
        self.request_redraw(Surface::Original);
        self.request_redraw(Surface::Processed);
        Some(FilterReport {
            filter,
            transparency,
        })
    }

    pub fn histogram(&self) -> Option<Histogram> {
        self.original.as_ref().map(|img| Histogram::of(&img.buffer))
    }

    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    pub fn original(&self) -> Option<&ImageStore> {
        self.original.as_ref()
    }

    pub fn current(&self) -> Option<&ImageStore> {
        self.current.as_ref()
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut ImageStore> {
        self.current.as_mut()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn request_redraw(&mut self, surface: Surface) {
        match surface {
            Surface::Original => self.redraw.original = true,
            Surface::Processed => self.redraw.processed = true,
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.any()
    }

    pub fn take_redraw(&mut self) -> Redraw {
        std::mem::take(&mut self.redraw)
    }
}
