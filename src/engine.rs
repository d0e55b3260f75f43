use log::{debug, info, warn};
use raylib::prelude::*;

use crate::config::Manifest;
use crate::controller::SlideController;
use crate::displacement::{layer_size, DisplacementEffect};
use crate::labels::{Label, LabelDeck, LabelPair};
use crate::nav::Nav;
use crate::slide::{Direction, SlideSet};
use crate::texture_loader::{cover_source_rect, load_textures};

pub trait Engine {
    fn handle_input(&mut self, rl: &RaylibHandle);
    fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread, framebuffer: &mut RenderTexture2D);
}

/// Slide layer, displacement pass and caption overlay for one canvas.
pub struct CarouselEngine {
    controller: SlideController<Texture2D>,
    effect: DisplacementEffect,
    layer: RenderTexture2D,
    font: WeakFont,
    nav: Nav,
    canvas: Vector2,
}

impl CarouselEngine {
    /// Loads every asset named by the manifest. Nothing is shown until all of
    /// them are on the GPU.
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        manifest: &Manifest,
        canvas: Vector2,
    ) -> anyhow::Result<Self> {
        let textures = load_textures(rl, thread, &manifest.image_paths())?;
        let effect = DisplacementEffect::new(rl, thread, manifest.displacement_path().as_deref(), canvas)?;
        let size = layer_size(canvas);
        let layer = rl
            .load_render_texture(thread, size.x as u32, size.y as u32)
            .map_err(|e| anyhow::anyhow!("failed to create slide layer: {}", e))?;

        let controller = SlideController::new(
            textures,
            manifest.slides.clone(),
            canvas.y,
            manifest.transition.clone(),
        )?;
        info!(
            "Slider ready: {} slides, {:?} policy, {:.1}s wipes",
            controller.count(),
            controller.slides().policy(),
            controller.settings().duration
        );

        Ok(Self {
            controller,
            effect,
            layer,
            font: rl.get_font_default(),
            nav: Nav::layout(canvas.x, canvas.y),
            canvas,
        })
    }
}

impl Engine for CarouselEngine {
    fn handle_input(&mut self, rl: &RaylibHandle) {
        let key = if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            Some(Direction::Next)
        } else if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            Some(Direction::Previous)
        } else {
            None
        };

        // Window coordinates to canvas coordinates
        let press = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT).then(|| {
            let mouse = rl.get_mouse_position();
            Vector2::new(
                mouse.x * self.canvas.x / rl.get_screen_width() as f32,
                mouse.y * self.canvas.y / rl.get_screen_height() as f32,
            )
        });

        let tap_to_advance = self.controller.settings().tap_to_advance;
        if let Some(direction) = self.nav.resolve(key, press, tap_to_advance) {
            match self.controller.advance(direction) {
                Ok(()) => {}
                Err(e) if e.is_navigation() => debug!("Ignoring {} request: {}", direction, e),
                Err(e) => warn!("Navigation failed: {}", e),
            }
        }
    }

    fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread, framebuffer: &mut RenderTexture2D) {
        if let Some(done) = self.controller.tick(dt) {
            info!("Showing slide {} of {}", done.to + 1, self.controller.count());
        }
        // Buttons keep their state for the length of a wipe
        if self.controller.is_idle() {
            self.nav.refresh(
                self.controller.can_advance(Direction::Previous),
                self.controller.can_advance(Direction::Next),
            );
        }
        self.effect.update(self.controller.filter(), self.canvas);

        let canvas = self.canvas;
        let controller = &self.controller;
        let effect = &mut self.effect;
        rl.draw_texture_mode(thread, &mut self.layer, |mut d| {
            d.clear_background(Color::BLACK);
            draw_slides(&mut d, controller.slides(), canvas);
            effect.draw_map(&mut d, canvas);
        });

        let layer = &self.layer;
        let font = &self.font;
        let nav = &self.nav;
        rl.draw_texture_mode(thread, framebuffer, |mut d| {
            d.clear_background(Color::BLACK);
            effect.draw_layer(&mut d, layer, canvas);
            if let Some(labels) = controller.labels() {
                draw_labels(&mut d, font, labels, canvas);
            }
            draw_nav(&mut d, font, nav, canvas);
        });
    }
}

fn draw_slides<D: RaylibDraw>(d: &mut D, slides: &SlideSet<Texture2D>, canvas: Vector2) {
    for slide in slides.iter() {
        // Parked slides are fully off the canvas
        if slide.offset.abs() >= canvas.y {
            continue;
        }
        let source = cover_source_rect(
            slide.image.width() as f32,
            slide.image.height() as f32,
            canvas.x,
            canvas.y,
        );
        let dest = Rectangle::new(0.0, slide.offset, canvas.x, canvas.y);
        d.draw_texture_pro(&slide.image, source, dest, Vector2::zero(), 0.0, Color::WHITE);
    }
}

struct LabelBox {
    x: f32,
    y: f32,
    width: f32,
    font_size: i32,
}

fn draw_label<D: RaylibDraw>(d: &mut D, label: &Label, area: &LabelBox) {
    if label.text.is_empty() || label.style.opacity <= 0.0 {
        return;
    }
    let y = area.y + label.style.vertical_offset(area.font_size as f32);
    d.draw_text(
        &label.text,
        area.x as i32,
        y as i32,
        area.font_size,
        Color::WHITE.fade(label.style.opacity.clamp(0.0, 1.0)),
    );
}

/// Draws a rolling label pair clipped to its box.
fn draw_clipped_pair<D: RaylibDraw + RaylibScissorModeExt>(d: &mut D, pair: &LabelPair, area: &LabelBox) {
    let mut s = d.begin_scissor_mode(
        area.x as i32,
        area.y as i32,
        area.width as i32,
        area.font_size,
    );
    draw_label(&mut s, &pair.current, area);
    draw_label(&mut s, &pair.next, area);
}

/// Width of `text` as `draw_text` lays it out with the default font.
fn text_width(font: &WeakFont, text: &str, font_size: i32) -> f32 {
    let size = font_size as f32;
    font.measure_text(text, size, size / 10.0).x
}

fn draw_labels<D: RaylibDraw + RaylibScissorModeExt>(d: &mut D, font: &WeakFont, labels: &LabelDeck, canvas: Vector2) {
    let margin = canvas.x * 0.06;

    let title = LabelBox {
        x: margin,
        y: canvas.y * 0.52,
        width: canvas.x * 0.6,
        font_size: (canvas.y * 0.1) as i32,
    };
    draw_clipped_pair(d, &labels.title, &title);

    let counter_size = (canvas.y * 0.05) as i32;
    let counter = LabelBox {
        x: canvas.x - margin - counter_size as f32 * 1.5,
        y: margin,
        width: counter_size as f32 * 1.5,
        font_size: counter_size,
    };
    draw_clipped_pair(d, &labels.counter, &counter);

    let font_size = (canvas.y * 0.025).max(10.0) as i32;
    let line_height = font_size as f32 * 1.4;
    let width = canvas.x * 0.4;
    let top = title.y + title.font_size as f32 * 1.3;
    for label in [&labels.description.current, &labels.description.next] {
        let lines = wrap_text(&label.text, width, |s| text_width(font, s, font_size));
        for (line_no, text) in lines.into_iter().enumerate() {
            let line = Label { text, style: label.style };
            let area = LabelBox {
                x: margin,
                y: top + line_no as f32 * line_height,
                width,
                font_size,
            };
            draw_label(d, &line, &area);
        }
    }
}

fn draw_nav<D: RaylibDraw>(d: &mut D, font: &WeakFont, nav: &Nav, canvas: Vector2) {
    let font_size = (canvas.y * 0.022).max(10.0) as i32;
    for button in nav.buttons.iter() {
        let color = if button.disabled {
            Color::WHITE.fade(0.3)
        } else {
            Color::WHITE
        };
        d.draw_rectangle_lines_ex(button.bounds, 2.0, color);

        let caption = button.caption();
        let caption_width = text_width(font, caption, font_size);
        d.draw_text(
            caption,
            (button.bounds.x + (button.bounds.width - caption_width) * 0.5) as i32,
            (button.bounds.y + (button.bounds.height - font_size as f32) * 0.5) as i32,
            font_size,
            color,
        );
    }
}

/// Greedy word wrap; a single word wider than `max_width` gets its own line.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
