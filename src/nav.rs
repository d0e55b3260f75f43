use raylib::prelude::*;

use crate::slide::Direction;

pub struct NavButton {
    pub direction: Direction,
    pub bounds: Rectangle,
    pub disabled: bool,
}

impl NavButton {
    pub fn caption(&self) -> &'static str {
        match self.direction {
            Direction::Previous => "PREV",
            Direction::Next => "NEXT",
        }
    }
}

/// The prev/next button pair drawn in the bottom-left corner of the canvas.
pub struct Nav {
    pub buttons: [NavButton; 2],
}

impl Nav {
    pub fn layout(canvas_width: f32, canvas_height: f32) -> Self {
        let margin = canvas_width * 0.06;
        let width = (canvas_width * 0.07).max(60.0);
        let height = (canvas_height * 0.05).max(28.0);
        let y = canvas_height - margin - height;

        let button = |direction, x| NavButton {
            direction,
            bounds: Rectangle::new(x, y, width, height),
            disabled: false,
        };

        Self {
            buttons: [
                button(Direction::Previous, margin),
                button(Direction::Next, margin + width + margin * 0.25),
            ],
        }
    }

    /// Disables a button when there is no slide in its direction.
    pub fn refresh(&mut self, has_prev: bool, has_next: bool) {
        for button in self.buttons.iter_mut() {
            button.disabled = match button.direction {
                Direction::Previous => !has_prev,
                Direction::Next => !has_next,
            };
        }
    }

    pub fn hit(&self, point: Vector2) -> Option<&NavButton> {
        self.buttons.iter().find(|b| b.bounds.check_collision_point_rec(point))
    }

    /// Direction requested by this frame's input, if any.
    ///
    /// Keys win over the pointer. A press on a disabled button is swallowed;
    /// a press elsewhere advances only in tap mode.
    pub fn resolve(&self, key: Option<Direction>, press: Option<Vector2>, tap_to_advance: bool) -> Option<Direction> {
        if key.is_some() {
            return key;
        }
        let point = press?;
        match self.hit(point) {
            Some(button) if button.disabled => None,
            Some(button) => Some(button.direction),
            None if tap_to_advance => Some(Direction::Next),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(rect: &Rectangle) -> Vector2 {
        Vector2::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    #[test]
    fn buttons_sit_side_by_side_inside_the_canvas() {
        let nav = Nav::layout(1280.0, 720.0);
        let [prev, next] = &nav.buttons;
        assert_eq!(prev.direction, Direction::Previous);
        assert_eq!(next.direction, Direction::Next);
        assert!(prev.bounds.x + prev.bounds.width < next.bounds.x);
        assert!(next.bounds.y + next.bounds.height <= 720.0);
    }

    #[test]
    fn clicks_map_to_button_direction() {
        let nav = Nav::layout(1280.0, 720.0);
        let next = center(&nav.buttons[1].bounds);
        assert_eq!(nav.resolve(None, Some(next), false), Some(Direction::Next));
        assert_eq!(nav.resolve(None, Some(Vector2::new(640.0, 100.0)), false), None);
        assert_eq!(nav.resolve(None, None, true), None);
    }

    #[test]
    fn disabled_buttons_swallow_clicks() {
        let mut nav = Nav::layout(1280.0, 720.0);
        nav.refresh(false, true);
        assert!(nav.buttons[0].disabled);
        assert!(!nav.buttons[1].disabled);

        let prev = center(&nav.buttons[0].bounds);
        assert_eq!(nav.resolve(None, Some(prev), true), None);
    }

    #[test]
    fn taps_outside_buttons_advance_in_tap_mode() {
        let nav = Nav::layout(1280.0, 720.0);
        let elsewhere = Some(Vector2::new(640.0, 100.0));
        assert_eq!(nav.resolve(None, elsewhere, true), Some(Direction::Next));
        assert_eq!(
            nav.resolve(Some(Direction::Previous), elsewhere, true),
            Some(Direction::Previous)
        );
    }
}
