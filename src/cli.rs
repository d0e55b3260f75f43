use std::path::PathBuf;

use clap::Parser;

use crate::config::TransitionSettings;
use crate::constants::{FPS, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::slide::WrapPolicy;
use crate::timeline::Easing;

#[derive(Parser, Debug)]
#[command(
    name = "ripple-slider",
    version,
    about = "Full-bleed image carousel with displacement-map wipes"
)]
pub struct Args {
    /// Image directory, or a slides.toml manifest.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Behaviour past the first/last slide.
    #[arg(long, value_enum)]
    pub policy: Option<WrapPolicy>,

    /// Wipe duration.
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Peak displacement at the middle of a wipe.
    #[arg(long, value_name = "PIXELS")]
    pub peak: Option<f32>,

    #[arg(long, value_enum)]
    pub easing: Option<Easing>,

    /// Vertical drift of the noise map per wipe.
    #[arg(long, value_name = "PIXELS")]
    pub drift: Option<f32>,

    /// Hide title, description and counter.
    #[arg(long)]
    pub no_labels: bool,

    /// Advance on a click or tap anywhere on the canvas.
    #[arg(long)]
    pub tap: bool,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = WINDOW_WIDTH, value_parser = clap::value_parser!(u32).range(1..=16384))]
    pub width: u32,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = WINDOW_HEIGHT, value_parser = clap::value_parser!(u32).range(1..=16384))]
    pub height: u32,

    #[arg(long, default_value_t = FPS)]
    pub fps: u32,
}

impl Args {
    /// Layers command-line overrides on top of the manifest's settings.
    pub fn apply(&self, settings: &mut TransitionSettings) {
        if let Some(policy) = self.policy {
            settings.policy = policy;
        }
        if let Some(duration) = self.duration {
            settings.duration = duration;
        }
        if let Some(peak) = self.peak {
            settings.peak_scale = peak;
        }
        if let Some(easing) = self.easing {
            settings.easing = easing;
        }
        if let Some(drift) = self.drift {
            settings.displacement_drift = drift;
        }
        if self.no_labels {
            settings.labels = false;
        }
        if self.tap {
            settings.tap_to_advance = true;
        }
    }
}
