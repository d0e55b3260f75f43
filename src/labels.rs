use std::path::PathBuf;

use serde::Deserialize;

use crate::constants::{DESCRIPTION_SHIFT, TITLE_SHIFT};
use crate::slide::Direction;
use crate::timeline::{Easing, Target, Track};

/// Caption data for one slide, as listed in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SlideMetadata {
    pub image: PathBuf,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Title,
    Description,
    Counter,
}

impl LabelKind {
    pub const ALL: [LabelKind; 3] = [LabelKind::Title, LabelKind::Description, LabelKind::Counter];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSlot {
    Current,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelProperty {
    /// Resting position, in percent of the label box height.
    Anchor,
    /// Translation in percent of the label box height.
    ShiftPercent,
    /// Translation in pixels.
    ShiftPx,
    Opacity,
}

/// Inline style overrides of a label. The default is "no overrides".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub anchor: f32,
    pub shift_percent: f32,
    pub shift_px: f32,
    pub opacity: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            anchor: 0.0,
            shift_percent: 0.0,
            shift_px: 0.0,
            opacity: 1.0,
        }
    }
}

impl LabelStyle {
    /// Vertical displacement in pixels for a label box of `box_height`.
    pub fn vertical_offset(&self, box_height: f32) -> f32 {
        (self.anchor + self.shift_percent) / 100.0 * box_height + self.shift_px
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub text: String,
    pub style: LabelStyle,
}

/// A "current" label and the "next" label that replaces it during a wipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelPair {
    pub current: Label,
    pub next: Label,
}

impl LabelPair {
    pub fn slot_mut(&mut self, slot: LabelSlot) -> &mut Label {
        match slot {
            LabelSlot::Current => &mut self.current,
            LabelSlot::Next => &mut self.next,
        }
    }

    /// Moves the next text into the current label and drops all style overrides.
    fn promote(&mut self) {
        self.current.text = std::mem::take(&mut self.next.text);
        self.current.style = LabelStyle::default();
        self.next.style = LabelStyle::default();
    }
}

/// Title, description and counter label pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelDeck {
    pub title: LabelPair,
    pub description: LabelPair,
    pub counter: LabelPair,
}

pub fn counter_text(index: usize) -> String {
    format!("{:02}", index + 1)
}

impl LabelDeck {
    /// Deck showing `meta` as the current slide.
    pub fn showing(index: usize, meta: &SlideMetadata) -> Self {
        let mut deck = Self::default();
        deck.title.current.text = meta.title.clone();
        deck.description.current.text = meta.description.clone();
        deck.counter.current.text = counter_text(index);
        deck
    }

    pub fn pair(&self, kind: LabelKind) -> &LabelPair {
        match kind {
            LabelKind::Title => &self.title,
            LabelKind::Description => &self.description,
            LabelKind::Counter => &self.counter,
        }
    }

    pub fn pair_mut(&mut self, kind: LabelKind) -> &mut LabelPair {
        match kind {
            LabelKind::Title => &mut self.title,
            LabelKind::Description => &mut self.description,
            LabelKind::Counter => &mut self.counter,
        }
    }

    /// Loads the incoming slide's captions into the "next" labels.
    pub fn stage(&mut self, index: usize, meta: &SlideMetadata) {
        self.title.next.text = meta.title.clone();
        self.description.next.text = meta.description.clone();
        self.counter.next.text = counter_text(index);
    }

    pub fn set(&mut self, kind: LabelKind, slot: LabelSlot, property: LabelProperty, value: f32) {
        let style = &mut self.pair_mut(kind).slot_mut(slot).style;
        match property {
            LabelProperty::Anchor => style.anchor = value,
            LabelProperty::ShiftPercent => style.shift_percent = value,
            LabelProperty::ShiftPx => style.shift_px = value,
            LabelProperty::Opacity => style.opacity = value,
        }
    }

    /// Swaps next into current once a transition has finished.
    pub fn promote(&mut self) {
        for kind in LabelKind::ALL {
            self.pair_mut(kind).promote();
        }
    }

    /// Cross-fade tracks for a wipe in `direction`.
    ///
    /// Title and counter roll through a clipped box: the next label is parked
    /// one box above (or below) and both labels shift by a full box height.
    /// The description slides a short distance while fading.
    pub fn tracks(direction: Direction, duration: f32, easing: Easing) -> Vec<Track> {
        let s = direction.sign();
        let target = |kind, slot, property| Target::Label(kind, slot, property);
        let mut tracks = Vec::new();

        for kind in [LabelKind::Title, LabelKind::Counter] {
            tracks.push(Track::set(
                target(kind, LabelSlot::Next, LabelProperty::Anchor),
                -s * TITLE_SHIFT,
                0.0,
            ));
            for slot in [LabelSlot::Current, LabelSlot::Next] {
                tracks.push(
                    Track::tween(target(kind, slot, LabelProperty::ShiftPercent), 0.0, s * TITLE_SHIFT)
                        .over(duration)
                        .eased(easing),
                );
            }
        }

        let description = LabelKind::Description;
        tracks.extend([
            Track::tween(target(description, LabelSlot::Current, LabelProperty::ShiftPx), 0.0, s * DESCRIPTION_SHIFT),
            Track::tween(target(description, LabelSlot::Current, LabelProperty::Opacity), 1.0, 0.0),
            Track::tween(target(description, LabelSlot::Next, LabelProperty::ShiftPx), -s * DESCRIPTION_SHIFT, 0.0),
            Track::tween(target(description, LabelSlot::Next, LabelProperty::Opacity), 0.0, 1.0),
        ]
        .map(|track| track.over(duration).eased(easing)));

        tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;

    fn meta(title: &str, description: &str) -> SlideMetadata {
        SlideMetadata {
            image: PathBuf::from(format!("{title}.jpg")),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn counter_is_one_based_and_zero_padded() {
        assert_eq!(counter_text(0), "01");
        assert_eq!(counter_text(9), "10");
    }

    #[test]
    fn promote_moves_next_text_and_clears_styles() {
        let mut deck = LabelDeck::showing(0, &meta("J110", "lounge"));
        deck.stage(1, &meta("J104", "dining"));
        deck.set(LabelKind::Title, LabelSlot::Next, LabelProperty::Anchor, -100.0);
        deck.set(LabelKind::Description, LabelSlot::Current, LabelProperty::Opacity, 0.0);

        deck.promote();

        assert_eq!(deck.title.current.text, "J104");
        assert_eq!(deck.description.current.text, "dining");
        assert_eq!(deck.counter.current.text, "02");
        for kind in LabelKind::ALL {
            let pair = deck.pair(kind);
            assert!(pair.next.text.is_empty());
            assert_eq!(pair.current.style, LabelStyle::default());
            assert_eq!(pair.next.style, LabelStyle::default());
        }
    }

    #[test]
    fn next_title_rolls_in_from_above_on_next() {
        let timeline = LabelDeck::tracks(Direction::Next, 2.0, Easing::ExpoInOut)
            .into_iter()
            .fold(Timeline::new(), Timeline::with);
        let anchor = Target::Label(LabelKind::Title, LabelSlot::Next, LabelProperty::Anchor);
        let shift = Target::Label(LabelKind::Title, LabelSlot::Next, LabelProperty::ShiftPercent);

        assert_eq!(timeline.value_of(anchor, 0.0), Some(-100.0));
        assert_eq!(timeline.value_of(shift, 0.0), Some(0.0));
        assert_eq!(timeline.value_of(shift, 2.0), Some(100.0));

        let style = LabelStyle {
            anchor: -100.0,
            shift_percent: 100.0,
            ..LabelStyle::default()
        };
        assert_eq!(style.vertical_offset(48.0), 0.0);
    }

    #[test]
    fn description_fades_in_reverse_on_previous() {
        let timeline = LabelDeck::tracks(Direction::Previous, 2.0, Easing::Linear)
            .into_iter()
            .fold(Timeline::new(), Timeline::with);
        let next_shift = Target::Label(LabelKind::Description, LabelSlot::Next, LabelProperty::ShiftPx);
        let current_opacity = Target::Label(LabelKind::Description, LabelSlot::Current, LabelProperty::Opacity);

        assert_eq!(timeline.value_of(next_shift, 0.0), Some(DESCRIPTION_SHIFT));
        assert_eq!(timeline.value_of(current_opacity, 1.0), Some(0.5));
        assert_eq!(timeline.value_of(current_opacity, 2.0), Some(0.0));
    }
}
