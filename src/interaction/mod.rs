//! Pointer and keyboard interaction shared by every overlay object.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::{Point, Shape};

/// Half-size of the square hit zone around a control point.
///
/// Shared by all overlay objects so drag handles feel identical everywhere.
pub const CONTROL_POINT_RADIUS: f64 = 6.0;

/// Default tolerance for grabbing thin lines.
pub const LINE_HITBOX: f64 = 4.0;

/// Default minimum interval between two keyboard nudges.
pub const DEFAULT_NUDGE_INTERVAL: Duration = Duration::from_millis(100);

#[must_use]
pub fn control_point_shape(center: Point) -> Shape {
    Shape::Handle {
        center,
        radius: CONTROL_POINT_RADIUS,
    }
}

#[must_use]
pub fn control_point_hit(center: Point, pointer: Point) -> bool {
    control_point_shape(center).hit_distance(pointer).is_some()
}

/// Index of the first control point whose handle contains `pointer`.
#[must_use]
pub fn find_control_point(points: &[Point], pointer: Point) -> Option<usize> {
    points
        .iter()
        .position(|center| control_point_hit(*center, pointer))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NudgeDirection {
    Up,
    Down,
}

impl NudgeDirection {
    /// Price steps applied per nudge.
    #[must_use]
    pub fn ticks(self) -> f64 {
        match self {
            NudgeDirection::Up => 1.0,
            NudgeDirection::Down => -1.0,
        }
    }
}

/// Caps how often keyboard nudges apply, independent of frame rate.
///
/// Uses monotonic timestamps supplied by the caller rather than a timer, so
/// it only ever answers "may I nudge now?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NudgeThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl Default for NudgeThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_NUDGE_INTERVAL)
    }
}

impl NudgeThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    #[must_use]
    pub fn interval(self) -> Duration {
        self.interval
    }

    /// Returns `true` and records `now` when the interval has elapsed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// What the pointer is currently dragging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    ControlPoint { object_id: String, index: usize },
    ExtraPoint { object_id: String, index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging(DragTarget),
}

/// Pointer state tracked across frames by the object registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    cursor: Point,
    hovered: Option<String>,
}

impl InteractionState {
    #[must_use]
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    #[must_use]
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, InteractionMode::Dragging(_))
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.cursor = Point::new(x, y);
    }

    pub fn set_hovered(&mut self, object_id: Option<String>) {
        self.hovered = object_id;
    }

    pub fn start_drag(&mut self, target: DragTarget) {
        self.mode = InteractionMode::Dragging(target);
    }

    pub fn end_drag(&mut self) -> Option<DragTarget> {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Dragging(target) => Some(target),
            InteractionMode::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{
        CONTROL_POINT_RADIUS, DragTarget, InteractionState, NudgeThrottle, find_control_point,
    };
    use crate::core::Point;

    #[test]
    fn control_point_zone_is_square() {
        let points = [Point::new(10.0, 10.0), Point::new(50.0, 50.0)];
        let corner = Point::new(10.0 + CONTROL_POINT_RADIUS, 10.0 - CONTROL_POINT_RADIUS);
        assert_eq!(find_control_point(&points, corner), Some(0));
        assert_eq!(find_control_point(&points, Point::new(52.0, 47.0)), Some(1));
        assert_eq!(find_control_point(&points, Point::new(30.0, 30.0)), None);
    }

    #[test]
    fn nudges_inside_interval_are_rejected() {
        let start = Instant::now();
        let mut throttle = NudgeThrottle::new(Duration::from_millis(100));
        assert!(throttle.try_acquire(start));
        assert!(!throttle.try_acquire(start + Duration::from_millis(40)));
        assert!(throttle.try_acquire(start + Duration::from_millis(100)));
        assert!(!throttle.try_acquire(start + Duration::from_millis(150)));
    }

    #[test]
    fn drag_lifecycle_returns_target_once() {
        let mut state = InteractionState::default();
        state.start_drag(DragTarget::ControlPoint {
            object_id: "a".to_owned(),
            index: 1,
        });
        assert!(state.is_dragging());
        assert!(state.end_drag().is_some());
        assert!(state.end_drag().is_none());
    }
}
