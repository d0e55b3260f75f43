use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use raylib::prelude::*;

mod cli;
mod config;
mod constants;
mod controller;
mod displacement;
mod engine;
mod error;
mod labels;
mod nav;
mod slide;
mod state;
mod texture_loader;
mod timeline;

use crate::cli::Args;
use crate::config::Manifest;
use crate::constants::*;
use crate::engine::{CarouselEngine, Engine};

/// Shows `message` in the window for a few seconds before giving up.
fn show_error(rl: &mut RaylibHandle, thread: &RaylibThread, message: &str) {
    let mut d = rl.begin_drawing(thread);
    d.clear_background(Color::BLACK);
    d.draw_text(&format!("Error: {}", message), 20, 20, 20, Color::RED);
    drop(d);
    std::thread::sleep(Duration::from_secs(5));
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut manifest = Manifest::load(&args.path)
        .with_context(|| format!("failed to load slides from {:?}", args.path))?;
    args.apply(&mut manifest.transition);
    manifest.transition.validate()?;
    info!("{} slides listed in {:?}", manifest.slides.len(), args.path);

    let (mut rl, thread) = raylib::init()
        .size(args.width as i32, args.height as i32)
        .title("Ripple Slider")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(args.fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // HiDPI screens get a denser canvas, up to twice the window size.
    let pixel_ratio = rl.get_window_scale_dpi().x.clamp(1.0, MAX_PIXEL_RATIO);
    let canvas = Vector2::new(
        (args.width as f32 * pixel_ratio).round(),
        (args.height as f32 * pixel_ratio).round(),
    );
    info!("Canvas {}x{} (pixel ratio {})", canvas.x, canvas.y, pixel_ratio);

    let mut engine = match CarouselEngine::new(&mut rl, &thread, &manifest, canvas) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{:#}", e);
            show_error(&mut rl, &thread, &e.to_string());
            return Err(e);
        }
    };

    let mut framebuffer = rl
        .load_render_texture(&thread, canvas.x as u32, canvas.y as u32)
        .map_err(|e| anyhow::anyhow!("failed to create framebuffer: {}", e))?;

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        engine.handle_input(&rl);
        engine.render_frame(dt, &mut rl, &thread, &mut framebuffer);

        // Scale the fixed-size canvas into the window
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;

        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }

    info!("Window closed");
    Ok(())
}
