use crate::placement::PixelPos;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Line, ShapeKind::Rectangle, ShapeKind::Circle];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb<u8>,
    pub width: u32,
}

/// Draws `kind` spanning `anchor` to `end` into `target`. Parts falling
/// outside the image are clipped.
pub fn render_shape(
    target: &mut RgbImage,
    kind: ShapeKind,
    anchor: PixelPos,
    end: PixelPos,
    stroke: &StrokeStyle,
) {
    match kind {
        ShapeKind::Line => stroke_segment(target, anchor.as_f32(), end.as_f32(), stroke),
        ShapeKind::Rectangle => stroke_rect(target, anchor, end, stroke),
        ShapeKind::Circle => {
            let (dx, dy) = (
                end.x as f64 - anchor.x as f64,
                end.y as f64 - anchor.y as f64,
            );
            let radius = (dx * dx + dy * dy).sqrt() as i32;
            stroke_circle(target, anchor.as_i32(), radius, stroke);
        }
    }
}

fn stroke_segment(target: &mut RgbImage, start: (f32, f32), end: (f32, f32), stroke: &StrokeStyle) {
    if stroke.width <= 1 {
        draw_line_segment_mut(target, start, end, stroke.color);
        return;
    }

    let radius = (stroke.width / 2) as i32;
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let steps = (dx * dx + dy * dy).sqrt().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (start.0 + dx * t).round() as i32;
        let y = (start.1 + dy * t).round() as i32;
        draw_filled_circle_mut(target, (x, y), radius, stroke.color);
    }
}

fn stroke_rect(target: &mut RgbImage, a: PixelPos, b: PixelPos, stroke: &StrokeStyle) {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));

    if stroke.width <= 1 {
        let rect = Rect::at(min_x as i32, min_y as i32).of_size(max_x - min_x + 1, max_y - min_y + 1);
        draw_hollow_rect_mut(target, rect, stroke.color);
        return;
    }

    let tl = (min_x as f32, min_y as f32);
    let tr = (max_x as f32, min_y as f32);
    let br = (max_x as f32, max_y as f32);
    let bl = (min_x as f32, max_y as f32);
    stroke_segment(target, tl, tr, stroke);
    stroke_segment(target, tr, br, stroke);
    stroke_segment(target, br, bl, stroke);
    stroke_segment(target, bl, tl, stroke);
}

fn stroke_circle(target: &mut RgbImage, center: (i32, i32), radius: i32, stroke: &StrokeStyle) {
    if stroke.width <= 1 {
        draw_hollow_circle_mut(target, center, radius, stroke.color);
        return;
    }

    let stamp = (stroke.width / 2) as i32;
    let circumference = 2.0 * std::f32::consts::PI * radius as f32;
    let steps = circumference.max(8.0) as u32;
    for i in 0..steps {
        let t = (i as f32 / steps as f32) * 2.0 * std::f32::consts::PI;
        let x = (center.0 as f32 + radius as f32 * t.cos()).round() as i32;
        let y = (center.1 as f32 + radius as f32 * t.sin()).round() as i32;
        draw_filled_circle_mut(target, (x, y), stamp, stroke.color);
    }
}

#[cfg(test)]
mod tests {
    use super::{render_shape, ShapeKind, StrokeStyle};
    use crate::placement::PixelPos;
    use image::{Rgb, RgbImage};

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const INK: Rgb<u8> = Rgb([0, 200, 0]);

    fn blank() -> RgbImage {
        RgbImage::from_pixel(100, 100, WHITE)
    }

    fn styles() -> [StrokeStyle; 2] {
        [
            StrokeStyle { color: INK, width: 1 },
            StrokeStyle { color: INK, width: 3 },
        ]
    }

    #[test]
    fn line_covers_both_endpoints() {
        for stroke in styles() {
            let mut img = blank();
            render_shape(&mut img, ShapeKind::Line, PixelPos::new(5, 5), PixelPos::new(80, 40), &stroke);
            assert_eq!(*img.get_pixel(5, 5), INK);
            assert_eq!(*img.get_pixel(80, 40), INK);
            assert_eq!(*img.get_pixel(80, 5), WHITE);
        }
    }

    #[test]
    fn rectangle_is_an_outline_for_either_corner_order() {
        for stroke in styles() {
            let mut img = blank();
            render_shape(&mut img, ShapeKind::Rectangle, PixelPos::new(50, 60), PixelPos::new(10, 10), &stroke);
            for (x, y) in [(10, 10), (50, 60), (30, 10), (30, 60), (10, 35), (50, 35)] {
                assert_eq!(*img.get_pixel(x, y), INK, "({x}, {y})");
            }
            assert_eq!(*img.get_pixel(30, 35), WHITE);
            assert_eq!(*img.get_pixel(70, 35), WHITE);
        }
    }

    #[test]
    fn circle_radius_is_distance_to_endpoint() {
        for stroke in styles() {
            let mut img = blank();
            // Distance is 5.
            render_shape(&mut img, ShapeKind::Circle, PixelPos::new(50, 50), PixelPos::new(53, 54), &stroke);
            assert_eq!(*img.get_pixel(55, 50), INK);
            assert_eq!(*img.get_pixel(45, 50), INK);
            assert_eq!(*img.get_pixel(50, 55), INK);
            assert_eq!(*img.get_pixel(50, 50), WHITE);
        }
    }

    #[test]
    fn shapes_near_the_edge_are_clipped() {
        let mut img = blank();
        let stroke = StrokeStyle { color: INK, width: 5 };
        render_shape(&mut img, ShapeKind::Circle, PixelPos::new(0, 0), PixelPos::new(99, 99), &stroke);
        render_shape(&mut img, ShapeKind::Rectangle, PixelPos::new(0, 0), PixelPos::new(99, 99), &stroke);
        assert_eq!(*img.get_pixel(99, 99), INK);
    }
}
