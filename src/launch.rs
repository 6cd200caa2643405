//! Staggered autolaunch batches.
//!
//! A batch is a fixed table of (origin, delay) slots. Scheduling a batch turns
//! every slot into a pending launch due at `now + delay`; the scheduler pops
//! due launches between frames, so launches from one batch trickle in over
//! about a second instead of appearing together.

use crate::geometry::Point;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Where along the bottom edge a launch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaunchOrigin {
    Left,
    Right,
    Center,
}

impl LaunchOrigin {
    pub fn resolve(self, width: f32, height: f32) -> Point {
        match self {
            Self::Left => Point::new(0.0, height),
            Self::Right => Point::new(width, height),
            Self::Center => Point::new(width / 2.0, height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSlot {
    pub origin: LaunchOrigin,
    pub delay_ms: u64,
}

const fn slot(origin: LaunchOrigin, delay_ms: u64) -> LaunchSlot {
    LaunchSlot { origin, delay_ms }
}

use LaunchOrigin::{Center, Left, Right};

pub const NARROW_BATCH: [LaunchSlot; 12] = [
    slot(Left, 0),
    slot(Left, 200),
    slot(Left, 400),
    slot(Left, 800),
    slot(Right, 200),
    slot(Right, 330),
    slot(Right, 830),
    slot(Right, 1000),
    slot(Center, 0),
    slot(Center, 200),
    slot(Center, 800),
    slot(Center, 330),
];

pub const STANDARD_BATCH: [LaunchSlot; 21] = [
    slot(Left, 0),
    slot(Left, 200),
    slot(Left, 400),
    slot(Left, 600),
    slot(Left, 800),
    slot(Left, 110),
    slot(Left, 1000),
    slot(Right, 0),
    slot(Right, 200),
    slot(Right, 800),
    slot(Right, 330),
    slot(Right, 110),
    slot(Right, 830),
    slot(Right, 1000),
    slot(Center, 0),
    slot(Center, 200),
    slot(Center, 600),
    slot(Center, 800),
    slot(Center, 750),
    slot(Center, 330),
    slot(Center, 830),
];

/// The batch for a surface `width` logical pixels wide.
pub fn batch_for_width(width: f32, narrow_max_width: f32) -> &'static [LaunchSlot] {
    if width <= narrow_max_width { &NARROW_BATCH } else { &STANDARD_BATCH }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PendingLaunch {
    due: Duration,
    // launches due at the same instant fire in scheduling order
    seq: u64,
    origin: LaunchOrigin,
}

/// Min-heap of pending launches keyed by due time.
#[derive(Debug, Default)]
pub struct LaunchQueue {
    pending: BinaryHeap<Reverse<PendingLaunch>>,
    next_seq: u64,
}

impl LaunchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Duration, slot: LaunchSlot) {
        let launch = PendingLaunch {
            due: now + Duration::from_millis(slot.delay_ms),
            seq: self.next_seq,
            origin: slot.origin,
        };
        self.next_seq += 1;
        self.pending.push(Reverse(launch));
    }

    pub fn schedule_batch(&mut self, now: Duration, slots: &[LaunchSlot]) {
        for &slot in slots {
            self.schedule(now, slot);
        }
    }

    /// Removes and returns the earliest launch due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<LaunchOrigin> {
        match self.pending.peek() {
            Some(Reverse(next)) if next.due <= now => {
                self.pending.pop().map(|Reverse(launch)| launch.origin)
            }
            _ => None,
        }
    }

    /// Pending launches as `(due, origin)`, earliest first.
    pub fn upcoming(&self) -> Vec<(Duration, LaunchOrigin)> {
        let mut launches: Vec<PendingLaunch> = self.pending.iter().map(|Reverse(l)| *l).collect();
        launches.sort_unstable();
        launches.into_iter().map(|l| (l.due, l.origin)).collect()
    }

    /// Drops every pending launch and returns how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
