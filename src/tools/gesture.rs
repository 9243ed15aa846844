use crate::placement::{PixelPos, ViewPlacement};
use crate::session::{Session, Surface};
use crate::tools::shapes::{render_shape, ShapeKind, StrokeStyle};
use egui::Pos2;
use image::RgbImage;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    ShapeSelected(ShapeKind),
    Dragging {
        kind: ShapeKind,
        anchor: PixelPos,
    },
}

impl GestureState {
    pub fn shape(&self) -> Option<ShapeKind> {
        match *self {
            GestureState::Idle => None,
            GestureState::ShapeSelected(kind) | GestureState::Dragging { kind, .. } => Some(kind),
        }
    }
}

/// Drag-to-draw for the shape tools.
///
/// Pointer positions arrive in view coordinates of the original surface and
/// are mapped through its placement. While dragging, each move rebuilds a
/// preview from `current`; only the release writes into `current`.
#[derive(Default)]
pub struct GestureEngine {
    state: GestureState,
    preview: Option<RgbImage>,
}

impl GestureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn preview(&self) -> Option<&RgbImage> {
        self.preview.as_ref()
    }

    pub fn status_text(&self) -> String {
        match self.state.shape() {
            Some(kind) => format!("Drawing {}: drag on the original image", kind.name()),
            None => "Ready".to_string(),
        }
    }

    pub fn select_shape(&mut self, session: &mut Session, kind: ShapeKind) {
        self.discard_preview(session);
        self.state = GestureState::ShapeSelected(kind);
        log::debug!("Selected {} tool", kind.name());
    }

    pub fn pointer_press(&mut self, session: &Session, placement: &ViewPlacement, pos: Pos2) {
        if !session.is_loaded() {
            return;
        }
        if let GestureState::ShapeSelected(kind) = self.state {
            self.state = GestureState::Dragging {
                kind,
                anchor: placement.to_image_coords(pos),
            };
        }
    }

    pub fn pointer_move(
        &mut self,
        session: &mut Session,
        placement: &ViewPlacement,
        pos: Pos2,
        stroke: &StrokeStyle,
    ) {
        let GestureState::Dragging { kind, anchor } = self.state else {
            return;
        };
        let Some(current) = session.current() else {
            return;
        };
        let mut preview = current.buffer.clone();
        render_shape(&mut preview, kind, anchor, placement.to_image_coords(pos), stroke);
        self.preview = Some(preview);
        session.request_redraw(Surface::Processed);
    }

    /// Commits the shape into `current`. Returns whether anything was drawn.
    pub fn pointer_release(
        &mut self,
        session: &mut Session,
        placement: &ViewPlacement,
        pos: Pos2,
        stroke: &StrokeStyle,
    ) -> bool {
        let GestureState::Dragging { kind, anchor } = self.state else {
            return false;
        };
        self.state = GestureState::ShapeSelected(kind);
        self.preview = None;
        let end = placement.to_image_coords(pos);
        let Some(current) = session.current_mut() else {
            return false;
        };
        render_shape(&mut current.buffer, kind, anchor, end, stroke);
        log::info!(
            "Committed {} from ({}, {}) to ({}, {})",
            kind.name(),
            anchor.x,
            anchor.y,
            end.x,
            end.y
        );
        session.request_redraw(Surface::Processed);
        true
    }

    /// The pointer left the original surface: drop the tool and any drag.
    pub fn pointer_leave(&mut self, session: &mut Session) {
        self.discard_preview(session);
        if self.state != GestureState::Idle {
            log::debug!("Pointer left the original surface, tool deselected");
        }
        self.state = GestureState::Idle;
    }

    /// Abandons an in-progress drag without committing, keeping the tool.
    pub fn cancel_drag(&mut self, session: &mut Session) {
        if let GestureState::Dragging { kind, .. } = self.state {
            self.discard_preview(session);
            self.state = GestureState::ShapeSelected(kind);
        }
    }

    fn discard_preview(&mut self, session: &mut Session) {
        if self.preview.take().is_some() {
            session.request_redraw(Surface::Processed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GestureEngine, GestureState};
    use crate::image_store::ImageStore;
    use crate::placement::{compute_placement, PixelPos, ViewPlacement};
    use crate::session::Session;
    use crate::tools::shapes::{ShapeKind, StrokeStyle};
    use egui::{Pos2, Vec2};
    use image::{Rgb, RgbImage};

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const INK: Rgb<u8> = Rgb([0, 200, 0]);
    const STROKE: StrokeStyle = StrokeStyle {
        color: INK,
        width: 2,
    };

    fn setup() -> (Session, GestureEngine, ViewPlacement) {
        let mut session = Session::new();
        session.load(ImageStore::from_buffer(RgbImage::from_pixel(100, 100, WHITE)), None);
        let engine = GestureEngine::new();
        // Same size as the image, so view and pixel coordinates coincide.
        let placement = compute_placement([100, 100], Vec2::new(100.0, 100.0)).unwrap();
        (session, engine, placement)
    }

    fn pixel(session: &Session, x: u32, y: u32) -> Rgb<u8> {
        session.current().unwrap().get_pixel(x, y).unwrap()
    }

    #[test]
    fn rectangle_commit() {
        let (mut session, mut engine, placement) = setup();
        engine.select_shape(&mut session, ShapeKind::Rectangle);
        engine.pointer_press(&session, &placement, Pos2::new(10.0, 10.0));
        assert_eq!(
            engine.state(),
            GestureState::Dragging {
                kind: ShapeKind::Rectangle,
                anchor: PixelPos::new(10, 10)
            }
        );

        engine.pointer_move(&mut session, &placement, Pos2::new(20.0, 15.0), &STROKE);
        assert_eq!(session.current(), session.original());
        let preview = engine.preview().expect("move renders a preview");
        assert_eq!(*preview.get_pixel(15, 10), INK);

        assert!(engine.pointer_release(&mut session, &placement, Pos2::new(50.0, 60.0), &STROKE));
        assert_eq!(engine.state(), GestureState::ShapeSelected(ShapeKind::Rectangle));
        assert!(engine.preview().is_none());

        for (x, y) in [(10, 10), (50, 60), (30, 10), (30, 60), (10, 40), (50, 40)] {
            assert_eq!(pixel(&session, x, y), INK, "({x}, {y})");
        }
        assert_eq!(pixel(&session, 30, 35), WHITE);
        // The preview's right edge at x = 20 was never committed.
        assert_eq!(pixel(&session, 20, 13), WHITE);
        let original = session.original().unwrap();
        assert!(original.buffer.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn leaving_the_surface_deselects_without_commit() {
        let (mut session, mut engine, placement) = setup();
        engine.select_shape(&mut session, ShapeKind::Line);
        engine.pointer_press(&session, &placement, Pos2::new(5.0, 5.0));
        engine.pointer_move(&mut session, &placement, Pos2::new(99.0, 50.0), &STROKE);
        engine.pointer_leave(&mut session);

        assert_eq!(engine.state(), GestureState::Idle);
        assert!(engine.preview().is_none());
        assert_eq!(engine.status_text(), "Ready");

        // The release arrives after the leave and must not draw.
        assert!(!engine.pointer_release(&mut session, &placement, Pos2::new(120.0, 50.0), &STROKE));
        assert_eq!(session.current(), session.original());
    }

    #[test]
    fn commits_accumulate() {
        let (mut session, mut engine, placement) = setup();
        engine.select_shape(&mut session, ShapeKind::Line);
        engine.pointer_press(&session, &placement, Pos2::new(5.0, 90.0));
        engine.pointer_release(&mut session, &placement, Pos2::new(90.0, 90.0), &STROKE);

        engine.select_shape(&mut session, ShapeKind::Circle);
        engine.pointer_press(&session, &placement, Pos2::new(40.0, 40.0));
        engine.pointer_release(&mut session, &placement, Pos2::new(50.0, 40.0), &STROKE);

        assert_eq!(pixel(&session, 50, 90), INK);
        assert_eq!(pixel(&session, 50, 40), INK);
        assert_eq!(pixel(&session, 40, 40), WHITE);
    }

    #[test]
    fn newer_preview_replaces_older_one() {
        let (mut session, mut engine, placement) = setup();
        engine.select_shape(&mut session, ShapeKind::Line);
        engine.pointer_press(&session, &placement, Pos2::new(10.0, 10.0));
        engine.pointer_move(&mut session, &placement, Pos2::new(90.0, 10.0), &STROKE);
        assert_eq!(*engine.preview().unwrap().get_pixel(80, 10), INK);

        engine.pointer_move(&mut session, &placement, Pos2::new(10.0, 90.0), &STROKE);
        let preview = engine.preview().unwrap();
        assert_eq!(*preview.get_pixel(80, 10), WHITE);
        assert_eq!(*preview.get_pixel(10, 80), INK);
        assert_eq!(session.current(), session.original());
    }

    #[test]
    fn letterboxed_press_maps_into_image_space() {
        let (mut session, mut engine, _) = setup();
        // 100x100 in 200x400: ratio 2, image starts 100px down.
        let placement = compute_placement([100, 100], Vec2::new(200.0, 400.0)).unwrap();
        engine.select_shape(&mut session, ShapeKind::Line);
        engine.pointer_press(&session, &placement, Pos2::new(20.0, 120.0));
        assert_eq!(
            engine.state(),
            GestureState::Dragging {
                kind: ShapeKind::Line,
                anchor: PixelPos::new(10, 10)
            }
        );
        // Released in the bottom margin: clamps to the last row.
        engine.pointer_release(&mut session, &placement, Pos2::new(20.0, 390.0), &STROKE);
        assert_eq!(pixel(&session, 10, 99), INK);
    }

    #[test]
    fn cancel_drag_keeps_tool_and_drops_preview() {
        let (mut session, mut engine, placement) = setup();
        engine.select_shape(&mut session, ShapeKind::Circle);
        engine.pointer_press(&session, &placement, Pos2::new(50.0, 50.0));
        engine.pointer_move(&mut session, &placement, Pos2::new(60.0, 50.0), &STROKE);
        engine.cancel_drag(&mut session);

        assert_eq!(engine.state(), GestureState::ShapeSelected(ShapeKind::Circle));
        assert!(engine.preview().is_none());
        assert_eq!(session.current(), session.original());
    }

    #[test]
    fn pointer_events_without_image_or_tool_are_ignored() {
        let mut session = Session::new();
        let mut engine = GestureEngine::new();
        let placement = compute_placement([100, 100], Vec2::new(100.0, 100.0)).unwrap();

        engine.pointer_press(&session, &placement, Pos2::new(1.0, 1.0));
        assert_eq!(engine.state(), GestureState::Idle);

        engine.select_shape(&mut session, ShapeKind::Rectangle);
        engine.pointer_press(&session, &placement, Pos2::new(1.0, 1.0));
        engine.pointer_move(&mut session, &placement, Pos2::new(9.0, 9.0), &STROKE);
        assert!(!engine.pointer_release(&mut session, &placement, Pos2::new(9.0, 9.0), &STROKE));
        assert_eq!(engine.state(), GestureState::ShapeSelected(ShapeKind::Rectangle));
        assert!(session.current().is_none());
        assert!(!session.take_redraw().any());
        engine.pointer_leave(&mut session);
        assert_eq!(engine.state(), GestureState::Idle);
    }
}
