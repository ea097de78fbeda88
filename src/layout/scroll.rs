use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepPhase {
    /// Content fits the viewport; nothing moves.
    Idle,
    Sweeping(Direction),
    Paused {
        until: Instant,
        next: Direction,
    },
    Dragging {
        pointer_origin: f64,
        offset_origin: f64,
        resume: Direction,
    },
}

/// Pointer input for the scrolling track. `pointer_x` is in track pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start { pointer_x: f64 },
    Move { pointer_x: f64 },
    Release,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollPhase {
    #[default]
    Idle,
    Sweeping,
    Paused,
    Dragging,
}

/// Serializable view of the scroll state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSnapshot {
    pub offset: f64,
    pub max_offset: f64,
    pub phase: ScrollPhase,
    /// Direction of travel, or the one to resume after a pause or drag.
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSettings {
    pub speed_px_per_sec: f64,
    pub pause: Duration,
}

/// Ping-pong auto-scroll of the scrolling track with manual drag override.
///
/// The offset never leaves `[0, max_offset]`.
#[derive(Debug, Clone)]
pub struct AutoScroll {
    phase: SweepPhase,
    offset: f64,
    max_offset: f64,
    settings: SweepSettings,
    last_tick: Option<Instant>,
}

impl AutoScroll {
    pub fn new(settings: SweepSettings) -> Self {
        Self {
            phase: SweepPhase::Idle,
            offset: 0.0,
            max_offset: 0.0,
            settings,
            last_tick: None,
        }
    }

    #[cfg(test)]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[cfg(test)]
    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SweepPhase::Dragging { .. })
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        let (phase, direction) = match self.phase {
            SweepPhase::Idle => (ScrollPhase::Idle, None),
            SweepPhase::Sweeping(direction) => (ScrollPhase::Sweeping, Some(direction)),
            SweepPhase::Paused { next, .. } => (ScrollPhase::Paused, Some(next)),
            SweepPhase::Dragging { resume, .. } => (ScrollPhase::Dragging, Some(resume)),
        };
        ScrollSnapshot {
            offset: self.offset,
            max_offset: self.max_offset,
            phase,
            direction,
        }
    }

    pub fn set_settings(&mut self, settings: SweepSettings) {
        self.settings = settings;
    }

    /// Applies a new scroll bound after a relayout. The current offset is kept
    /// when still in range and clamped otherwise.
    pub fn set_bounds(&mut self, max_offset: f64, now: Instant) {
        self.max_offset = if max_offset.is_finite() {
            max_offset.max(0.0)
        } else {
            0.0
        };
        self.offset = self.offset.clamp(0.0, self.max_offset);

        match self.phase {
            SweepPhase::Dragging { .. } => {}
            _ if self.max_offset <= 0.0 => self.phase = SweepPhase::Idle,
            SweepPhase::Idle => {
                self.phase = SweepPhase::Sweeping(Direction::Forward);
                self.last_tick = Some(now);
            }
            SweepPhase::Sweeping(_) | SweepPhase::Paused { .. } => {}
        }
    }

    /// Advances the sweep to `now` and returns the offset.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        match self.phase {
            SweepPhase::Idle | SweepPhase::Dragging { .. } => {}
            SweepPhase::Paused { until, next } => {
                if now >= until {
                    self.phase = SweepPhase::Sweeping(next);
                }
            }
            SweepPhase::Sweeping(direction) => {
                let delta = self.settings.speed_px_per_sec * elapsed.as_secs_f64();
                let reached_end = match direction {
                    Direction::Forward => {
                        self.offset = (self.offset + delta).min(self.max_offset);
                        self.offset >= self.max_offset
                    }
                    Direction::Backward => {
                        self.offset = (self.offset - delta).max(0.0);
                        self.offset <= 0.0
                    }
                };
                if reached_end {
                    self.phase = SweepPhase::Paused {
                        until: now + self.settings.pause,
                        next: direction.reversed(),
                    };
                }
            }
        }

        self.offset
    }

    /// Suspends the sweep; the direction in effect is remembered for release.
    pub fn begin_drag(&mut self, pointer_x: f64) {
        let resume = match self.phase {
            SweepPhase::Idle => Direction::Forward,
            SweepPhase::Sweeping(direction) => direction,
            SweepPhase::Paused { next, .. } => next,
            SweepPhase::Dragging { .. } => return,
        };
        self.phase = SweepPhase::Dragging {
            pointer_origin: pointer_x,
            offset_origin: self.offset,
            resume,
        };
    }

    /// Moves the content with the pointer: dragging left scrolls forward.
    pub fn drag_to(&mut self, pointer_x: f64) -> f64 {
        if let SweepPhase::Dragging {
            pointer_origin,
            offset_origin,
            ..
        } = self.phase
        {
            let target = offset_origin - (pointer_x - pointer_origin);
            self.offset = target.clamp(0.0, self.max_offset);
        }
        self.offset
    }

    /// Resumes sweeping from wherever the drag left the offset.
    pub fn end_drag(&mut self, now: Instant) {
        if let SweepPhase::Dragging { resume, .. } = self.phase {
            self.last_tick = Some(now);
            self.phase = if self.max_offset > 0.0 {
                SweepPhase::Sweeping(resume)
            } else {
                SweepPhase::Idle
            };
        }
    }

    pub fn apply(&mut self, event: DragEvent, now: Instant) -> f64 {
        match event {
            DragEvent::Start { pointer_x } => self.begin_drag(pointer_x),
            DragEvent::Move { pointer_x } => {
                self.drag_to(pointer_x);
            }
            DragEvent::Release => self.end_drag(now),
        }
        self.offset
    }
}
