use crate::slide::Direction;
use crate::timeline::Timeline;

/// A wipe in flight.
#[derive(Debug, Clone)]
pub struct Transition {
    pub direction: Direction,
    pub from: usize,
    pub target: usize,
    pub timeline: Timeline,
}

#[derive(Debug, Clone)]
pub enum ControllerState {
    Idle,                      // Showing the active slide, accepting navigation
    Transitioning(Transition), // Wipe running, navigation rejected
}

impl ControllerState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ControllerState::Idle)
    }
}
