use log::{debug, info};

use crate::config::TransitionSettings;
use crate::displacement::DisplacementFilter;
use crate::error::SliderError;
use crate::labels::{LabelDeck, SlideMetadata};
use crate::slide::{Direction, SlideSet};
use crate::state::{ControllerState, Transition};
use crate::timeline::{Target, Timeline, Track};

/// Reported by [`SlideController::tick`] when a wipe lands.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Completed {
    pub direction: Direction,
    pub from: usize,
    pub to: usize,
}

/// Owns the slides and runs one wipe at a time.
///
/// All visual state the renderer reads (slide offsets, filter parameters,
/// label text and styles) is written here and nowhere else.
pub struct SlideController<T> {
    slides: SlideSet<T>,
    metadata: Vec<SlideMetadata>,
    labels: Option<LabelDeck>,
    filter: DisplacementFilter,
    canvas_height: f32,
    settings: TransitionSettings,
    state: ControllerState,
}

impl<T> SlideController<T> {
    pub fn new(
        images: Vec<T>,
        metadata: Vec<SlideMetadata>,
        canvas_height: f32,
        settings: TransitionSettings,
    ) -> Result<Self, SliderError> {
        if images.is_empty() {
            return Err(SliderError::Empty);
        }

        let slides = SlideSet::new(images, canvas_height, settings.policy);
        let labels = settings.labels.then(|| {
            LabelDeck::showing(0, metadata.first().unwrap_or(&SlideMetadata::default()))
        });

        Ok(Self {
            slides,
            metadata,
            labels,
            filter: DisplacementFilter::default(),
            canvas_height,
            settings,
            state: ControllerState::Idle,
        })
    }

    pub fn active_index(&self) -> usize {
        self.slides.active()
    }

    pub fn next_index(&self) -> Option<usize> {
        self.slides.next_index()
    }

    pub fn prev_index(&self) -> Option<usize> {
        self.slides.prev_index()
    }

    pub fn count(&self) -> usize {
        self.slides.count()
    }

    pub fn slides(&self) -> &SlideSet<T> {
        &self.slides
    }

    pub fn filter(&self) -> &DisplacementFilter {
        &self.filter
    }

    pub fn labels(&self) -> Option<&LabelDeck> {
        self.labels.as_ref()
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Whether `advance(direction)` would start a wipe right now.
    pub fn can_advance(&self, direction: Direction) -> bool {
        self.is_idle() && self.slides.neighbor(direction).is_some()
    }

    pub fn next(&mut self) -> Result<(), SliderError> {
        self.advance(Direction::Next)
    }

    pub fn previous(&mut self) -> Result<(), SliderError> {
        self.advance(Direction::Previous)
    }

    /// Starts a wipe towards the neighbour in `direction`.
    ///
    /// Rejected without touching any state while another wipe is running or
    /// when there is no neighbour under the configured policy.
    pub fn advance(&mut self, direction: Direction) -> Result<(), SliderError> {
        if !self.state.is_idle() {
            return Err(SliderError::TransitionInProgress);
        }
        let from = self.slides.active();
        let target = self
            .slides
            .neighbor(direction)
            .ok_or(SliderError::NavigationOutOfRange { direction, from })?;

        if let Some(labels) = &mut self.labels {
            let fallback = SlideMetadata::default();
            labels.stage(target, self.metadata.get(target).unwrap_or(&fallback));
        }

        let timeline = self.build_timeline(direction, from, target);
        self.apply(&timeline.sample(0.0));
        info!("Transition {} from slide {} to slide {}", direction, from, target);

        self.state = ControllerState::Transitioning(Transition {
            direction,
            from,
            target,
            timeline,
        });
        Ok(())
    }

    fn build_timeline(&self, direction: Direction, from: usize, target: usize) -> Timeline {
        let TransitionSettings {
            duration,
            peak_scale,
            easing,
            displacement_drift,
            ..
        } = self.settings;
        let h = self.canvas_height;
        let s = direction.sign();
        let half = duration / 2.0;

        let mut timeline = Timeline::new()
            .with(Track::tween(Target::SlideOffset(from), 0.0, s * h).over(duration).eased(easing))
            .with(Track::tween(Target::SlideOffset(target), -s * h, 0.0).over(duration).eased(easing))
            .with(Track::tween(Target::FilterScale, 0.0, peak_scale).over(half).eased(easing))
            .with(Track::tween(Target::FilterScale, peak_scale, 0.0).at(half).over(half).eased(easing));

        if displacement_drift != 0.0 {
            let shift = self.filter.shift;
            timeline.push(
                Track::tween(Target::MapShift, shift, shift + displacement_drift)
                    .over(duration)
                    .eased(easing),
            );
        }

        if self.labels.is_some() {
            for track in LabelDeck::tracks(direction, duration, easing) {
                timeline.push(track);
            }
        }

        timeline
    }

    fn apply(&mut self, values: &[(Target, f32)]) {
        for &(target, value) in values {
            match target {
                Target::SlideOffset(index) => {
                    if let Some(slide) = self.slides.get_mut(index) {
                        slide.offset = value;
                    }
                }
                Target::FilterScale => self.filter.scale = value,
                Target::MapShift => self.filter.shift = value,
                Target::Label(kind, slot, property) => {
                    if let Some(labels) = &mut self.labels {
                        labels.set(kind, slot, property, value);
                    }
                }
            }
        }
    }

    /// Advances the running wipe by `dt` seconds.
    ///
    /// Returns the finished transition on the tick that completes it; the
    /// controller is idle again by the time this returns.
    pub fn tick(&mut self, dt: f32) -> Option<Completed> {
        let ControllerState::Transitioning(transition) = &mut self.state else {
            return None;
        };

        transition.timeline.advance(dt);
        let values = transition.timeline.current();
        let finished = transition.timeline.is_finished();
        let completed = Completed {
            direction: transition.direction,
            from: transition.from,
            to: transition.target,
        };

        self.apply(&values);
        if !finished {
            return None;
        }

        self.slides.set_active(completed.to);
        self.slides.park(self.canvas_height);
        if let Some(labels) = &mut self.labels {
            labels.promote();
        }
        self.state = ControllerState::Idle;
        debug!("Slide {} is now active", completed.to);

        Some(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelStyle;
    use crate::slide::WrapPolicy;
    use std::path::PathBuf;

    const H: f32 = 720.0;

    fn settings(policy: WrapPolicy) -> TransitionSettings {
        TransitionSettings {
            policy,
            ..TransitionSettings::default()
        }
    }

    fn chairs() -> Vec<SlideMetadata> {
        [("J110", "Lounge chair comfort"), ("J104", "Dining and easy chair")]
            .iter()
            .map(|(title, description)| SlideMetadata {
                image: PathBuf::from(format!("{}.jpg", title.to_lowercase())),
                title: title.to_string(),
                description: description.to_string(),
            })
            .collect()
    }

    fn controller(count: usize, policy: WrapPolicy) -> SlideController<usize> {
        SlideController::new((0..count).collect(), Vec::new(), H, settings(policy)).expect("controller")
    }

    fn offsets<T>(controller: &SlideController<T>) -> Vec<f32> {
        controller.slides().iter().map(|slide| slide.offset).collect()
    }

    /// Runs the current wipe to completion in frame-sized steps.
    fn finish<T>(controller: &mut SlideController<T>) -> Completed {
        for _ in 0..1000 {
            if let Some(completed) = controller.tick(1.0 / 60.0) {
                return completed;
            }
        }
        panic!("transition never completed");
    }

    #[test]
    fn empty_image_list_is_rejected() {
        let result = SlideController::<usize>::new(Vec::new(), Vec::new(), H, TransitionSettings::default());
        assert!(matches!(result, Err(SliderError::Empty)));
    }

    #[test]
    fn two_slides_next_then_wrap_back_to_first() {
        let mut c = controller(2, WrapPolicy::Wrap);
        c.next().expect("next");
        let done = finish(&mut c);
        assert_eq!(done, Completed { direction: Direction::Next, from: 0, to: 1 });
        assert_eq!(c.active_index(), 1);
        assert_eq!(offsets(&c), vec![H, 0.0]);

        c.next().expect("wrap");
        finish(&mut c);
        assert_eq!(c.active_index(), 0);
        assert!(c.slides().is_at_rest(H));
    }

    #[test]
    fn two_slides_clamp_refuses_to_pass_the_end() {
        let mut c = controller(2, WrapPolicy::Clamp);
        c.next().expect("next");
        finish(&mut c);
        assert!(!c.can_advance(Direction::Next));

        let err = c.next().expect_err("clamped");
        assert!(matches!(
            err,
            SliderError::NavigationOutOfRange { direction: Direction::Next, from: 1 }
        ));
        assert!(c.is_idle());
        assert_eq!(c.active_index(), 1);
        assert_eq!(offsets(&c), vec![H, 0.0]);
    }

    #[test]
    fn next_then_previous_round_trips_from_every_start() {
        for policy in [WrapPolicy::Wrap, WrapPolicy::Clamp] {
            for start in 0..4 {
                let mut c = controller(4, policy);
                while c.active_index() != start {
                    c.next().expect("walk");
                    finish(&mut c);
                }
                if !c.can_advance(Direction::Next) {
                    continue;
                }
                let before = offsets(&c);

                c.next().expect("next");
                finish(&mut c);
                c.previous().expect("previous");
                finish(&mut c);

                assert_eq!(c.active_index(), start, "{policy:?} from {start}");
                assert_eq!(offsets(&c), before, "{policy:?} from {start}");
            }
        }
    }

    #[test]
    fn rest_layout_holds_before_and_after_every_wipe() {
        let mut c = controller(3, WrapPolicy::Wrap);
        assert!(c.slides().is_at_rest(H));
        for direction in [Direction::Next, Direction::Next, Direction::Previous, Direction::Next, Direction::Next] {
            c.advance(direction).expect("advance");
            finish(&mut c);
            assert!(c.slides().is_at_rest(H));
            assert_eq!(c.slides().iter().filter(|s| s.offset == 0.0).count(), 1);
        }
    }

    #[test_log::test]
    fn advancing_mid_transition_is_rejected() {
        let mut c = controller(3, WrapPolicy::Wrap);
        c.next().expect("next");
        c.tick(0.5);

        assert!(matches!(c.next(), Err(SliderError::TransitionInProgress)));
        assert!(matches!(c.previous(), Err(SliderError::TransitionInProgress)));
        assert!(!c.can_advance(Direction::Next));
        assert_eq!(c.active_index(), 0);

        let done = finish(&mut c);
        assert_eq!(done.to, 1);
        assert_eq!(c.active_index(), 1);
    }

    #[test]
    fn filter_pulses_and_settles_to_zero() {
        let mut c = controller(2, WrapPolicy::Wrap);
        let duration = c.settings().duration;
        let peak = c.settings().peak_scale;

        c.next().expect("next");
        assert_eq!(c.filter().scale, 0.0);

        assert_eq!(c.tick(duration / 2.0), None);
        assert_eq!(c.filter().scale, peak);
        assert!(c.filter().is_active());

        let done = c.tick(duration / 2.0);
        assert!(done.is_some());
        assert_eq!(c.filter().scale, 0.0);
    }

    #[test]
    fn filter_rises_smoothly_for_a_shorter_wipe() {
        let settings = TransitionSettings {
            duration: 1.25,
            ..TransitionSettings::default()
        };
        let peak = settings.peak_scale;
        let mut c = SlideController::new(vec![0, 1], Vec::new(), H, settings).expect("controller");
        c.next().expect("next");

        let half = 1.25 / 2.0;
        c.tick(0.6 * half);
        let scale = c.filter().scale;
        assert!(scale > 0.0 && scale < peak, "scale {scale} at 0.6 of the rise");

        let mut previous = scale;
        let mut elapsed = 0.6 * half;
        while elapsed + 0.01 < half {
            c.tick(0.01);
            elapsed += 0.01;
            let scale = c.filter().scale;
            assert!(scale >= previous && scale - previous < peak / 4.0, "{previous} -> {scale}");
            previous = scale;
        }

        // The slide is still mid-way when the filter peaks.
        let mid = offsets(&c);
        assert!(mid[0] > 0.0 && mid[0] < H);
    }

    #[test]
    fn target_slide_enters_from_the_opposite_side() {
        let mut c = controller(3, WrapPolicy::Wrap);
        c.previous().expect("previous");
        // Wrapping backwards from 0 lands on 2, which enters from below.
        assert_eq!(offsets(&c), vec![0.0, -H, H]);

        c.tick(1.0);
        let mid = offsets(&c);
        assert!(mid[0] < 0.0 && mid[0] > -H);
        assert!(mid[2] > 0.0 && mid[2] < H);

        finish(&mut c);
        assert_eq!(c.active_index(), 2);
        assert_eq!(offsets(&c), vec![H, H, 0.0]);
    }

    #[test]
    fn labels_cross_fade_to_the_next_caption() {
        let mut c = SlideController::new(vec!["j110", "j104"], chairs(), H, TransitionSettings::default())
            .expect("controller");
        let labels = c.labels().expect("labels");
        assert_eq!(labels.title.current.text, "J110");
        assert_eq!(labels.counter.current.text, "01");

        c.next().expect("next");
        let labels = c.labels().expect("labels");
        assert_eq!(labels.title.next.text, "J104");
        assert_eq!(labels.title.next.style.anchor, -100.0);
        assert_eq!(labels.description.next.style.opacity, 0.0);

        c.tick(1.0);
        let opacity = c.labels().expect("labels").description.current.style.opacity;
        assert!(opacity > 0.0 && opacity < 1.0);

        finish(&mut c);
        let labels = c.labels().expect("labels");
        assert_eq!(labels.title.current.text, "J104");
        assert_eq!(labels.description.current.text, "Dining and easy chair");
        assert_eq!(labels.counter.current.text, "02");
        assert!(labels.title.next.text.is_empty());
        assert_eq!(labels.title.current.style, LabelStyle::default());
    }

    #[test]
    fn labels_can_be_disabled() {
        let settings = TransitionSettings {
            labels: false,
            ..TransitionSettings::default()
        };
        let mut c = SlideController::new(vec![(), ()], chairs(), H, settings).expect("controller");
        assert!(c.labels().is_none());
        c.next().expect("next");
        finish(&mut c);
        assert_eq!(c.active_index(), 1);
    }

    #[test]
    fn drift_moves_the_noise_map_across_wipes() {
        let settings = TransitionSettings {
            displacement_drift: 50.0,
            ..TransitionSettings::default()
        };
        let mut c = SlideController::new(vec![0, 1], Vec::new(), H, settings).expect("controller");
        c.next().expect("next");
        finish(&mut c);
        assert_eq!(c.filter().shift, 50.0);
        c.next().expect("next");
        finish(&mut c);
        assert_eq!(c.filter().shift, 100.0);
    }

    #[test]
    fn single_slide_cannot_move() {
        let mut c = controller(1, WrapPolicy::Wrap);
        assert!(matches!(c.next(), Err(SliderError::NavigationOutOfRange { .. })));
        assert!(matches!(c.previous(), Err(SliderError::NavigationOutOfRange { .. })));
        assert_eq!(c.tick(1.0), None);
    }
}
