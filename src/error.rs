use std::path::PathBuf;

use crate::slide::Direction;

/// Failures surfaced by the loader and the slide controller.
///
/// None of these are fatal to a running carousel; only `AssetLoadFailed` and
/// `Empty` stop start-up, before a controller exists.
#[derive(Debug, thiserror::Error)]
pub enum SliderError {
    #[error("failed to load asset {path:?}: {reason}")]
    AssetLoadFailed { path: PathBuf, reason: String },
    #[error("no slide in the {direction} direction from slide {from}")]
    NavigationOutOfRange { direction: Direction, from: usize },
    #[error("a transition is already in progress")]
    TransitionInProgress,
    #[error("the slide set is empty")]
    Empty,
}

impl SliderError {
    pub fn asset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SliderError::AssetLoadFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Navigation errors are expected during normal use and only worth a debug line.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            SliderError::NavigationOutOfRange { .. } | SliderError::TransitionInProgress
        )
    }
}
