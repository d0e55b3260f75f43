//! Asset manifest and transition settings.
//!
//! A carousel is described by a TOML manifest:
//!
//! ```toml
//! base_path = "images"
//! displacement = "disp2.jpg"
//!
//! [transition]
//! duration = 2.0
//! peak_scale = 25.0
//! policy = "wrap"
//!
//! [[slides]]
//! image = "j110.jpg"
//! title = "J110"
//! description = "Lounge chair comfort, dining chair function."
//! ```
//!
//! A plain directory of images works too; titles then come from file names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::*;
use crate::labels::SlideMetadata;
use crate::slide::WrapPolicy;
use crate::timeline::Easing;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionSettings {
    pub duration: f32,
    pub peak_scale: f32,
    pub policy: WrapPolicy,
    pub easing: Easing,
    pub displacement_drift: f32,
    pub labels: bool,
    pub tap_to_advance: bool,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration: TRANSITION_DURATION,
            peak_scale: PEAK_DISPLACEMENT,
            policy: WrapPolicy::default(),
            easing: Easing::default(),
            displacement_drift: DISPLACEMENT_DRIFT,
            labels: true,
            tap_to_advance: false,
        }
    }
}

impl TransitionSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "transition duration must be a positive number of seconds, got {}",
                self.duration
            )));
        }
        if !self.peak_scale.is_finite() || !self.displacement_drift.is_finite() {
            return Err(ConfigError::Invalid(
                "peak_scale and displacement_drift must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub base_path: PathBuf,
    #[serde(default)]
    pub displacement: Option<PathBuf>,
    #[serde(default)]
    pub transition: TransitionSettings,
    #[serde(default)]
    pub slides: Vec<SlideMetadata>,
}

impl Manifest {
    /// Loads a manifest file, or a directory holding either `slides.toml` or images.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.is_dir() {
            let manifest = path.join(MANIFEST_FILE);
            if manifest.is_file() {
                Self::from_file(&manifest)
            } else {
                Self::from_directory(path)
            }
        } else {
            Self::from_file(path)
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::parse(&text)?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        manifest.base_path = root.join(&manifest.base_path);
        Ok(manifest)
    }

    /// Parses manifest text; `base_path` stays as written.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest = toml::from_str(text)?;
        if manifest.slides.is_empty() {
            return Err(ConfigError::Invalid("manifest lists no slides".to_string()));
        }
        manifest.transition.validate()?;
        Ok(manifest)
    }

    /// Builds a manifest from the image files of a directory, sorted by name.
    pub fn from_directory(dir: &Path) -> Result<Self, ConfigError> {
        let slides = load_sorted_image_paths(dir)?
            .into_iter()
            .map(|path| SlideMetadata {
                title: path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                description: String::new(),
                image: path,
            })
            .collect();

        Ok(Self {
            base_path: PathBuf::new(),
            displacement: None,
            transition: TransitionSettings::default(),
            slides,
        })
    }

    pub fn image_paths(&self) -> Vec<PathBuf> {
        self.slides
            .iter()
            .map(|slide| self.base_path.join(&slide.image))
            .collect()
    }

    pub fn displacement_path(&self) -> Option<PathBuf> {
        self.displacement.as_ref().map(|image| self.base_path.join(image))
    }
}

fn is_image(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "png" | "jpg" | "jpeg" | "bmp" | "gif"
        ),
        None => false,
    }
}

pub fn load_sorted_image_paths(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if paths.is_empty() {
        Err(ConfigError::Invalid(format!("no image files found in {}", dir.display())))
    } else {
        Ok(paths)
    }
}
