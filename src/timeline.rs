//! Declarative animation timeline.
//!
//! A transition is a list of [`Track`]s, each interpolating one numeric
//! property between two values over a window of the shared clock. The
//! timeline holds no references to what it animates: [`Timeline::sample`]
//! turns a point in time into `(Target, value)` pairs and the owner writes
//! them wherever they belong.

use raylib::ease;
use serde::Deserialize;

use crate::labels::{LabelKind, LabelProperty, LabelSlot};

/// Easing curves, all backed by `raylib::ease`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    QuadInOut,
    CubicInOut,
    SineInOut,
    #[default]
    ExpoInOut,
}

impl Easing {
    fn function(self) -> fn(f32, f32, f32, f32) -> f32 {
        match self {
            Easing::Linear => ease::linear_none,
            Easing::QuadInOut => ease::quad_in_out,
            Easing::CubicInOut => ease::cubic_in_out,
            Easing::SineInOut => ease::sine_in_out,
            Easing::ExpoInOut => ease::expo_in_out,
        }
    }

    /// Value between `from` and `to` after `t` of `duration` seconds.
    pub fn interpolate(self, t: f32, from: f32, to: f32, duration: f32) -> f32 {
        if duration <= 0.0 || t >= duration {
            return to;
        }
        if t <= 0.0 {
            return from;
        }
        // raylib's expo_in_out is only exact over a two-unit clock, so every
        // curve runs on normalized progress.
        (self.function())(2.0 * t / duration, from, to - from, 2.0)
    }
}

/// Property a track writes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    SlideOffset(usize),
    FilterScale,
    MapShift,
    Label(LabelKind, LabelSlot, LabelProperty),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub target: Target,
    pub from: f32,
    pub to: f32,
    pub start: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Track {
    /// Linear tween from `from` to `to` starting at 0 with zero duration;
    /// chain `at`/`over`/`eased` to shape it.
    pub fn tween(target: Target, from: f32, to: f32) -> Self {
        Self {
            target,
            from,
            to,
            start: 0.0,
            duration: 0.0,
            easing: Easing::Linear,
        }
    }

    /// Instant assignment at `start`.
    pub fn set(target: Target, value: f32, start: f32) -> Self {
        Self::tween(target, value, value).at(start)
    }

    pub fn at(mut self, start: f32) -> Self {
        self.start = start.max(0.0);
        self
    }

    pub fn over(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// `None` until the clock reaches the track's start.
    pub fn value_at(&self, t: f32) -> Option<f32> {
        if t < self.start {
            return None;
        }
        Some(self.easing.interpolate(t - self.start, self.from, self.to, self.duration))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    tracks: Vec<Track>,
    elapsed: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, track: Track) {
        // Keep tracks ordered by start so later windows override earlier ones.
        let position = self.tracks.partition_point(|t| t.start <= track.start);
        self.tracks.insert(position, track);
    }

    pub fn with(mut self, track: Track) -> Self {
        self.push(track);
        self
    }

    pub fn duration(&self) -> f32 {
        self.tracks.iter().map(Track::end).fold(0.0, f32::max)
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration()
    }

    /// Moves the clock forward, clamped to the timeline's end.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration());
    }

    /// Values of every started track at time `t`, in application order.
    ///
    /// When two started tracks share a target, the one that started later
    /// appears later and therefore wins.
    pub fn sample(&self, t: f32) -> Vec<(Target, f32)> {
        self.tracks
            .iter()
            .filter_map(|track| track.value_at(t).map(|value| (track.target, value)))
            .collect()
    }

    pub fn current(&self) -> Vec<(Target, f32)> {
        self.sample(self.elapsed)
    }

    /// Last value written to `target` at time `t`.
    #[cfg(test)]
    pub fn value_of(&self, target: Target, t: f32) -> Option<f32> {
        self.sample(t)
            .into_iter()
            .filter(|(candidate, _)| *candidate == target)
            .map(|(_, value)| value)
            .last()
    }
}
