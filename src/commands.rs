use crate::filters::Filter;
use crate::session::Surface;
use crate::tools::ShapeKind;
use egui::{Pos2, Vec2};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Discrete menu or keyboard commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Open(PathBuf),
    ApplyFilter(Filter),
    SelectShape(ShapeKind),
    ShowHistogram,
    Quit,
}

/// Pointer input on the original surface, in surface-local view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press(Pos2),
    Move(Pos2),
    Release(Pos2),
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Action(Action),
    Pointer(PointerEvent),
    CanvasResized { surface: Surface, size: Vec2 },
}

impl From<Action> for Event {
    fn from(action: Action) -> Self {
        Event::Action(action)
    }
}

impl From<PointerEvent> for Event {
    fn from(pointer: PointerEvent) -> Self {
        Event::Pointer(pointer)
    }
}

/// Events collected during a frame, handed to the dispatcher in arrival order.
#[derive(Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: impl Into<Event>) {
        self.events.push_back(event.into());
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
