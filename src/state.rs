use crate::commands::{Action, Event, EventQueue, PointerEvent};
use crate::error::DegenerateCanvas;
use crate::filters::Histogram;
use crate::placement::{compute_placement, ViewPlacement};
use crate::session::{Session, Surface};
use crate::tools::{GestureEngine, ShapeKind, StrokeStyle};
use egui::Vec2;
use image::{Rgb, RgbImage};

pub const IDLE_STATUS: &str = "Ready";

pub struct ToolSettings {
    pub stroke_color: Rgb<u8>,
    pub line_width: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            stroke_color: Rgb([0, 255, 0]),
            line_width: 2,
        }
    }
}

impl ToolSettings {
    pub fn stroke(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.stroke_color,
            width: self.line_width,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Shortcut {
    pub key: egui::Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Shortcut {
    pub fn new(key: egui::Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ctrl(mut self, value: bool) -> Self {
        self.ctrl = value;
        self
    }

    pub fn matches(&self, i: &egui::InputState) -> bool {
        i.key_pressed(self.key)
            && i.modifiers.ctrl == self.ctrl
            && i.modifiers.shift == self.shift
            && i.modifiers.alt == self.alt
    }

    pub fn format(&self) -> String {
        let mut s = String::new();
        if self.ctrl {
            s.push_str("Ctrl+");
        }
        if self.shift {
            s.push_str("Shift+");
        }
        if self.alt {
            s.push_str("Alt+");
        }
        s.push_str(&format!("{:?}", self.key));
        s
    }
}

pub struct Keybindings {
    pub open: Shortcut,
    pub quit: Shortcut,
    pub line: Shortcut,
    pub rect: Shortcut,
    pub circle: Shortcut,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            open: Shortcut::new(egui::Key::O).ctrl(true),
            quit: Shortcut::new(egui::Key::Q).ctrl(true),
            line: Shortcut::new(egui::Key::L),
            rect: Shortcut::new(egui::Key::R),
            circle: Shortcut::new(egui::Key::C),
        }
    }
}

impl Keybindings {
    pub fn shape(&self, kind: ShapeKind) -> Shortcut {
        match kind {
            ShapeKind::Line => self.line,
            ShapeKind::Rectangle => self.rect,
            ShapeKind::Circle => self.circle,
        }
    }
}

/// Application controller: owns the session and gesture engine and applies
/// events to them one at a time.
pub struct AppState {
    pub session: Session,
    pub gesture: GestureEngine,
    pub tool_settings: ToolSettings,
    pub keybindings: Keybindings,
    pub status: String,
    pub histogram: Option<Histogram>,
    pub quit_requested: bool,
    original_canvas: Vec2,
    processed_canvas: Vec2,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            gesture: GestureEngine::new(),
            tool_settings: ToolSettings::default(),
            keybindings: Keybindings::default(),
            status: IDLE_STATUS.to_string(),
            histogram: None,
            quit_requested: false,
            original_canvas: Vec2::ZERO,
            processed_canvas: Vec2::ZERO,
        }
    }

    pub fn drain(&mut self, queue: &mut EventQueue) {
        while let Some(event) = queue.pop() {
            self.dispatch(event);
        }
    }

    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Action(action) => {
                // A menu or keyboard command never lands in the middle of a drag.
                self.gesture.cancel_drag(&mut self.session);
                self.handle_action(action);
            }
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::CanvasResized { surface, size } => self.resize(surface, size),
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Open(path) => match self.session.open(&path) {
                Ok([w, h]) => {
                    self.histogram = None;
                    let name = path
                        .file_name()
                        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
                    self.status = format!("Loaded {name} ({w}x{h})");
                }
                Err(e) => {
                    log::error!("{e}");
                    self.status = format!("Could not open image: {e}");
                }
            },
            Action::ApplyFilter(filter) => {
                if let Some(report) = self.session.apply_filter(filter) {
                    if let Some(share) = report.transparency {
                        log::info!("Transparency level: {:.2}%", share * 100.0);
                        self.status = format!("Transparency level: {:.2}%", share * 100.0);
                    }
                }
            }
            Action::SelectShape(kind) => {
                self.gesture.select_shape(&mut self.session, kind);
                self.status = self.gesture.status_text();
            }
            Action::ShowHistogram => {
                if let Some(histogram) = self.session.histogram() {
                    self.histogram = Some(histogram);
                }
            }
            Action::Quit => self.quit_requested = true,
        }
    }

    fn handle_pointer(&mut self, pointer: PointerEvent) {
        if let PointerEvent::Leave = pointer {
            let had_tool = self.gesture.state().shape().is_some();
            self.gesture.pointer_leave(&mut self.session);
            if had_tool {
                self.status = IDLE_STATUS.to_string();
            }
            return;
        }

        if !self.session.is_loaded() {
            return;
        }
        let placement = match self.placement(Surface::Original) {
            Ok(p) => p,
            Err(e) => {
                log::trace!("Pointer ignored: {e}");
                return;
            }
        };
        let stroke = self.tool_settings.stroke();
        match pointer {
            PointerEvent::Press(pos) => self.gesture.pointer_press(&self.session, &placement, pos),
            PointerEvent::Move(pos) => {
                self.gesture
                    .pointer_move(&mut self.session, &placement, pos, &stroke);
            }
            PointerEvent::Release(pos) => {
                self.gesture
                    .pointer_release(&mut self.session, &placement, pos, &stroke);
            }
            PointerEvent::Leave => {}
        }
    }

    fn resize(&mut self, surface: Surface, size: Vec2) {
        let slot = match surface {
            Surface::Original => &mut self.original_canvas,
            Surface::Processed => &mut self.processed_canvas,
        };
        if *slot != size {
            *slot = size;
            self.session.request_redraw(surface);
        }
    }

    pub fn canvas_size(&self, surface: Surface) -> Vec2 {
        match surface {
            Surface::Original => self.original_canvas,
            Surface::Processed => self.processed_canvas,
        }
    }

    /// Placement of the buffer shown on `surface` at its last reported size.
    pub fn placement(&self, surface: Surface) -> Result<ViewPlacement, DegenerateCanvas> {
        let image = self.display_buffer(surface).ok_or(DegenerateCanvas::EmptyImage)?;
        compute_placement([image.width(), image.height()], self.canvas_size(surface))
    }

    /// What `surface` should show: the original, or the drag preview if one
    /// exists and the current image otherwise.
    pub fn display_buffer(&self, surface: Surface) -> Option<&RgbImage> {
        match surface {
            Surface::Original => self.session.original().map(|img| img.get_buffer()),
            Surface::Processed => self
                .gesture
                .preview()
                .or_else(|| self.session.current().map(|img| img.get_buffer())),
        }
    }
}
