//! Fit-and-center mapping between a surface (view) and image pixels.
//!
//! View points are relative to the surface's top-left corner. The image is
//! scaled uniformly to fit the surface and centered, leaving letterbox
//! margins on one axis.

use crate::error::DegenerateCanvas;
use egui::{Pos2, Rect, Vec2};

/// Integer pixel coordinate inside an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPos {
    pub x: u32,
    pub y: u32,
}

impl PixelPos {
    #[cfg(test)]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn as_f32(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }

    pub fn as_i32(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewPlacement {
    pub image_size: [u32; 2],
    /// Uniform fit ratio, `min(cw / w, ch / h)`.
    pub ratio: f32,
    /// Displayed size in whole view pixels.
    pub size: Vec2,
    /// Top-left corner of the displayed image inside the surface.
    pub offset: Vec2,
}

pub fn compute_placement(
    image_size: [u32; 2],
    canvas_size: Vec2,
) -> Result<ViewPlacement, DegenerateCanvas> {
    let cw = canvas_size.x.floor();
    let ch = canvas_size.y.floor();
    // Also rejects NaN.
    if !(cw > 0.0 && ch > 0.0) {
        return Err(DegenerateCanvas::Canvas {
            width: canvas_size.x,
            height: canvas_size.y,
        });
    }
    let [w, h] = image_size;
    if w == 0 || h == 0 {
        return Err(DegenerateCanvas::EmptyImage);
    }

    let (w, h) = (w as f32, h as f32);
    let ratio = (cw / w).min(ch / h);
    let new_w = (w * ratio).round().clamp(1.0, cw);
    let new_h = (h * ratio).round().clamp(1.0, ch);
    let offset = Vec2::new(((cw - new_w) / 2.0).floor(), ((ch - new_h) / 2.0).floor());

    Ok(ViewPlacement {
        image_size,
        ratio,
        size: Vec2::new(new_w, new_h),
        offset,
    })
}

impl ViewPlacement {
    /// View pixels per image pixel on each axis, after rounding the size.
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            self.size.x / self.image_size[0] as f32,
            self.size.y / self.image_size[1] as f32,
        )
    }

    /// Maps a view point to the image pixel under it. Points in the
    /// letterbox margin or outside the surface clamp to the nearest edge pixel.
    pub fn to_image_coords(&self, view: Pos2) -> PixelPos {
        let scale = self.scale();
        let fx = ((view.x - self.offset.x) / scale.x).floor();
        let fy = ((view.y - self.offset.y) / scale.y).floor();
        PixelPos {
            x: clamp_axis(fx, self.image_size[0]),
            y: clamp_axis(fy, self.image_size[1]),
        }
    }

    /// Maps an image pixel to the view point at its centre.
    pub fn to_view_coords(&self, pixel: PixelPos) -> Pos2 {
        let scale = self.scale();
        Pos2::new(
            self.offset.x + (pixel.x as f32 + 0.5) * scale.x,
            self.offset.y + (pixel.y as f32 + 0.5) * scale.y,
        )
    }

    /// Where the image lands on screen for a surface occupying `canvas`.
    pub fn image_rect(&self, canvas: Rect) -> Rect {
        Rect::from_min_size(canvas.min + self.offset, self.size)
    }

    #[cfg(test)]
    pub fn contains(&self, view: Pos2) -> bool {
        Rect::from_min_size(Pos2::ZERO + self.offset, self.size).contains(view)
    }
}

fn clamp_axis(value: f32, extent: u32) -> u32 {
    // `as` saturates and maps NaN to 0.
    (value as i64).clamp(0, extent as i64 - 1) as u32
}
