use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Sign of the vertical travel: the outgoing slide moves down on `Next`.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Next => 1.0,
            Direction::Previous => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Previous => f.write_str("prev"),
            Direction::Next => f.write_str("next"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(Direction::Previous),
            "next" => Ok(Direction::Next),
            other => Err(format!("unknown direction '{other}' (expected 'prev' or 'next')")),
        }
    }
}

/// What happens when navigating past the first or last slide.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WrapPolicy {
    /// Last slide goes to the first and vice versa.
    #[default]
    Wrap,
    /// Navigation stops at the ends.
    Clamp,
}

pub struct Slide<T> {
    pub index: usize,
    pub image: T,
    pub offset: f32,
}

/// Ordered slides plus the active index.
///
/// At rest exactly one slide sits at offset 0; the rest are parked one canvas
/// height above or below.
pub struct SlideSet<T> {
    slides: Vec<Slide<T>>,
    active: usize,
    policy: WrapPolicy,
}

impl<T> SlideSet<T> {
    /// Places the first image on screen and parks the others above the canvas.
    pub fn new(images: Vec<T>, canvas_height: f32, policy: WrapPolicy) -> Self {
        let slides = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| Slide { index, image, offset: 0.0 })
            .collect();

        let mut set = Self { slides, active: 0, policy };
        set.park(canvas_height);
        set
    }

    /// Resets every offset to the rest layout for the active index: earlier
    /// slides below the canvas, later slides above it.
    ///
    /// Only slides that are off screen move, so this is invisible after a
    /// completed wipe.
    pub fn park(&mut self, canvas_height: f32) {
        let active = self.active;
        for slide in self.slides.iter_mut() {
            slide.offset = match slide.index.cmp(&active) {
                std::cmp::Ordering::Less => canvas_height,
                std::cmp::Ordering::Equal => 0.0,
                std::cmp::Ordering::Greater => -canvas_height,
            };
        }
    }

    pub fn count(&self) -> usize {
        self.slides.len()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn policy(&self) -> WrapPolicy {
        self.policy
    }

    pub fn next_index(&self) -> Option<usize> {
        self.neighbor(Direction::Next)
    }

    pub fn prev_index(&self) -> Option<usize> {
        self.neighbor(Direction::Previous)
    }

    /// Index reached by moving one step in `direction`, if any.
    ///
    /// A single slide has no neighbours under either policy.
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        let count = self.count();
        if count < 2 {
            return None;
        }
        match (self.policy, direction) {
            (WrapPolicy::Wrap, Direction::Next) => Some((self.active + 1) % count),
            (WrapPolicy::Wrap, Direction::Previous) => Some((self.active + count - 1) % count),
            (WrapPolicy::Clamp, Direction::Next) => {
                (self.active + 1 < count).then_some(self.active + 1)
            }
            (WrapPolicy::Clamp, Direction::Previous) => self.active.checked_sub(1),
        }
    }

    pub(crate) fn set_active(&mut self, index: usize) {
        debug_assert!(index < self.count());
        self.active = index;
    }

    pub fn get(&self, index: usize) -> Option<&Slide<T>> {
        self.slides.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Slide<T>> {
        self.slides.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide<T>> {
        self.slides.iter()
    }

    /// True when the active slide is the only one on screen and every other
    /// slide is parked exactly one canvas height away.
    pub fn is_at_rest(&self, canvas_height: f32) -> bool {
        self.slides.iter().all(|slide| {
            if slide.index == self.active {
                slide.offset == 0.0
            } else {
                slide.offset.abs() == canvas_height
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(count: usize, policy: WrapPolicy) -> SlideSet<usize> {
        SlideSet::new((0..count).collect(), 100.0, policy)
    }

    #[test]
    fn first_slide_is_visible_and_others_parked_above() {
        let slides = set(3, WrapPolicy::Wrap);
        let offsets: Vec<f32> = slides.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, -100.0, -100.0]);
        assert!(slides.is_at_rest(100.0));
    }

    #[test]
    fn wrap_policy_uses_modulo_neighbours() {
        let mut slides = set(3, WrapPolicy::Wrap);
        assert_eq!(slides.next_index(), Some(1));
        assert_eq!(slides.prev_index(), Some(2));

        slides.set_active(2);
        assert_eq!(slides.next_index(), Some(0));
        assert_eq!(slides.prev_index(), Some(1));
    }

    #[test]
    fn park_depends_only_on_the_active_index() {
        let mut slides = set(4, WrapPolicy::Wrap);
        slides.set_active(2);
        slides.park(100.0);
        let offsets: Vec<f32> = slides.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![100.0, 100.0, 0.0, -100.0]);
        assert!(slides.is_at_rest(100.0));
    }

    #[test]
    fn clamp_policy_stops_at_the_ends() {
        let mut slides = set(3, WrapPolicy::Clamp);
        assert_eq!(slides.prev_index(), None);
        assert_eq!(slides.next_index(), Some(1));

        slides.set_active(2);
        assert_eq!(slides.next_index(), None);
        assert_eq!(slides.prev_index(), Some(1));
    }

    #[test]
    fn single_slide_has_no_neighbours() {
        for policy in [WrapPolicy::Wrap, WrapPolicy::Clamp] {
            let slides = set(1, policy);
            assert_eq!(slides.next_index(), None);
            assert_eq!(slides.prev_index(), None);
        }
    }

    #[test]
    fn direction_parses_button_attributes() {
        assert_eq!("prev".parse::<Direction>(), Ok(Direction::Previous));
        assert_eq!("next".parse::<Direction>(), Ok(Direction::Next));
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::Next.to_string(), "next");
        assert_eq!(Direction::Previous.to_string(), "prev");
    }
}
