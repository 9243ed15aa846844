use crate::error::LoadError;
use image::RgbImage;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageStore {
    pub buffer: RgbImage,
}

impl ImageStore {
    pub fn from_buffer(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let img = image::open(path).map_err(|source| LoadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            buffer: img.to_rgb8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<image::Rgb<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.buffer.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn get_buffer(&self) -> &RgbImage {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::ImageStore;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    #[test]
    fn missing_file_is_a_load_error() {
        let err = ImageStore::from_file(Path::new("/definitely/not/here.png"))
            .expect_err("missing file must fail");
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }

    #[test]
    fn get_pixel_is_bounds_checked() {
        let store = ImageStore::from_buffer(RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])));
        assert_eq!(store.get_pixel(3, 2), Some(Rgb([1, 2, 3])));
        assert_eq!(store.get_pixel(4, 0), None);
        assert_eq!(store.size(), [4, 3]);
    }
}
