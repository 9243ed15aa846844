use crate::commands::{Action, Event, EventQueue, PointerEvent};
use crate::filters::{Filter, Histogram};
use crate::placement::compute_placement;
use crate::session::Surface;
use crate::state::AppState;
use crate::tools::ShapeKind;
use eframe::egui::{
    self, Color32, Context, PointerButton, Pos2, Rect, Sense, Stroke, TextureOptions, Ui, Vec2,
};
use eframe::Frame;
use image::RgbImage;

pub struct LabApp {
    state: AppState,
    queue: EventQueue,
    original_texture: Option<egui::TextureHandle>,
    processed_texture: Option<egui::TextureHandle>,
    pointer_in_source: bool,
}

impl LabApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Tokyonight Theme
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(26, 27, 38); // #1a1b26
        visuals.panel_fill = Color32::from_rgb(26, 27, 38);
        visuals.extreme_bg_color = Color32::from_rgb(22, 22, 30);
        cc.egui_ctx.set_visuals(visuals);

        Self {
            state: AppState::new(),
            queue: EventQueue::new(),
            original_texture: None,
            processed_texture: None,
            pointer_in_source: false,
        }
    }

    fn update_textures(&mut self, ctx: &Context) {
        let redraw = self.state.session.take_redraw();

        if redraw.original || self.original_texture.is_none() {
            self.original_texture = self
                .state
                .display_buffer(Surface::Original)
                .map(|img| upload(ctx, "original_image", img));
        }
        if redraw.processed || self.processed_texture.is_none() {
            self.processed_texture = self
                .state
                .display_buffer(Surface::Processed)
                .map(|img| upload(ctx, "processed_image", img));
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
            .pick_file()
        {
            self.queue.push(Action::Open(path));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        let kb = &self.state.keybindings;
        let (open, quit) = ctx.input(|i| (kb.open.matches(i), kb.quit.matches(i)));
        let shape = ShapeKind::ALL
            .into_iter()
            .find(|kind| ctx.input(|i| kb.shape(*kind).matches(i)));

        if open {
            self.pick_file();
        }
        if quit {
            self.queue.push(Action::Quit);
        }
        if let Some(kind) = shape {
            self.queue.push(Action::SelectShape(kind));
        }
    }

    fn menu_bar(&mut self, ui: &mut Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open = egui::Button::new("Open Image")
                    .shortcut_text(self.state.keybindings.open.format());
                if ui.add(open).clicked() {
                    ui.close_menu();
                    self.pick_file();
                }
                let quit =
                    egui::Button::new("Quit").shortcut_text(self.state.keybindings.quit.format());
                if ui.add(quit).clicked() {
                    ui.close_menu();
                    self.queue.push(Action::Quit);
                }
            });

            ui.menu_button("Edit", |ui| {
                for filter in Filter::ALL.into_iter().filter(|f| !f.is_convolution()) {
                    if ui.button(filter.name()).clicked() {
                        ui.close_menu();
                        self.queue.push(Action::ApplyFilter(filter));
                    }
                }
                if ui.button("Histogram").clicked() {
                    ui.close_menu();
                    self.queue.push(Action::ShowHistogram);
                }
                ui.menu_button("Filters", |ui| {
                    for filter in Filter::ALL.into_iter().filter(|f| f.is_convolution()) {
                        if ui.button(filter.name()).clicked() {
                            ui.close_menu();
                            self.queue.push(Action::ApplyFilter(filter));
                        }
                    }
                });
            });

            ui.menu_button("Draw", |ui| {
                for kind in ShapeKind::ALL {
                    let button = egui::Button::new(kind.name())
                        .shortcut_text(self.state.keybindings.shape(kind).format());
                    if ui.add(button).clicked() {
                        ui.close_menu();
                        self.queue.push(Action::SelectShape(kind));
                    }
                }
            });
        });
    }

    fn render_surface(&mut self, ui: &mut Ui, surface: Surface) {
        let sense = match surface {
            Surface::Original => Sense::click_and_drag(),
            Surface::Processed => Sense::hover(),
        };
        let (response, painter) = ui.allocate_painter(ui.available_size(), sense);
        let canvas = response.rect;

        if canvas.size() != self.state.canvas_size(surface) {
            self.queue.push(Event::CanvasResized {
                surface,
                size: canvas.size(),
            });
        }

        painter.rect_filled(canvas, 0.0, Color32::from_rgb(22, 22, 30));

        let texture = match surface {
            Surface::Original => &self.original_texture,
            Surface::Processed => &self.processed_texture,
        };
        match (texture, self.state.display_buffer(surface)) {
            (Some(texture), Some(image)) => {
                match compute_placement([image.width(), image.height()], canvas.size()) {
                    Ok(placement) => {
                        let image_rect = placement.image_rect(canvas);
                        painter.image(
                            texture.id(),
                            image_rect,
                            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                            Color32::WHITE,
                        );
                        painter.rect_stroke(image_rect, 0.0, Stroke::new(1.0, Color32::from_gray(60)));
                    }
                    Err(e) => log::trace!("Skipping draw: {e}"),
                }
            }
            _ if surface == Surface::Original => {
                painter.text(
                    canvas.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("Open an image ({})", self.state.keybindings.open.format()),
                    egui::FontId::proportional(16.0),
                    Color32::from_gray(140),
                );
            }
            _ => {}
        }

        if surface == Surface::Original {
            self.collect_pointer(ui, &response, canvas);
        }
    }

    fn collect_pointer(&mut self, ui: &Ui, response: &egui::Response, canvas: Rect) {
        let to_local = |p: Pos2| (p - canvas.min).to_pos2();
        let latest = ui.input(|i| i.pointer.latest_pos());

        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui.input(|i| i.pointer.press_origin()).or(latest);
            if let Some(p) = origin {
                self.queue.push(PointerEvent::Press(to_local(p)));
            }
        }
        if response.dragged_by(PointerButton::Primary) && response.drag_delta() != Vec2::ZERO {
            if let Some(p) = latest {
                self.queue.push(PointerEvent::Move(to_local(p)));
            }
        }
        if response.drag_stopped_by(PointerButton::Primary) {
            if let Some(p) = response.interact_pointer_pos().or(latest) {
                self.queue.push(PointerEvent::Release(to_local(p)));
            }
        }

        let inside = latest.is_some_and(|p| canvas.contains(p));
        if self.pointer_in_source && !inside {
            self.queue.push(PointerEvent::Leave);
        }
        self.pointer_in_source = inside;
    }

    fn histogram_window(&mut self, ctx: &Context) {
        let Some(histogram) = &self.state.histogram else {
            return;
        };
        let mut open = true;
        egui::Window::new("Histogram")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| draw_histogram(ui, histogram));
        if !open {
            self.state.histogram = None;
        }
    }
}

fn upload(ctx: &Context, name: &str, image: &RgbImage) -> egui::TextureHandle {
    let color_image = egui::ColorImage::from_rgb(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    );
    ctx.load_texture(name, color_image, TextureOptions::LINEAR)
}

fn draw_histogram(ui: &mut Ui, histogram: &Histogram) {
    let size = Vec2::new(512.0, 200.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(22, 22, 30));

    let peak = histogram.max_count().max(1) as f32;
    let colors = [
        Color32::from_rgb(230, 80, 80),
        Color32::from_rgb(80, 200, 100),
        Color32::from_rgb(90, 140, 240),
    ];
    for (bins, color) in histogram.channels.iter().zip(colors) {
        let points = bins
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Pos2::new(
                    rect.min.x + i as f32 / 255.0 * rect.width(),
                    rect.max.y - count as f32 / peak * rect.height(),
                )
            })
            .collect();
        painter.add(egui::Shape::line(points, Stroke::new(1.0, color)));
    }
}

impl eframe::App for LabApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.update_textures(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar(ui));

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status);
                if let Some(path) = self.state.session.source() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(path.display().to_string());
                    });
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                columns[0].vertical_centered(|ui| ui.label("Original Image"));
                columns[1].vertical_centered(|ui| ui.label("Processed Image"));
                self.render_surface(&mut columns[0], Surface::Original);
                self.render_surface(&mut columns[1], Surface::Processed);
            });
        });

        self.histogram_window(ctx);

        self.state.drain(&mut self.queue);
        if self.state.quit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        // Stale textures are uploaded at the start of the next frame.
        if self.state.session.needs_redraw() {
            ctx.request_repaint();
        }
    }
}
