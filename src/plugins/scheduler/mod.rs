//! Fire-once timers keyed by entity.
//!
//! Deferred work (trap expiry, projectile lifetime, feedback fade, combo notes)
//! is queued here instead of in closures. When a timer comes due it is published
//! as a [`TimerFired`] message; the plugin that owns the variant handles it and
//! must check that its target entity is still alive first. A despawned entity
//! makes the callback a no-op, so timers never need cancelling.
//!
//! ```text
//! schedule(now, delay, event) ──► heap (due, seq)
//!                                   │  dispatch_timers (FrameSet::Timers)
//!                                   ▼
//!                             TimerFired(event) ──► owning plugin handler
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::clock::SessionClock;
use crate::common::sets::FrameSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// Return a trapped enemy to patrol.
    ReleaseTrap(Entity),
    ExpireProjectile(Entity),
    /// Remove a floating text or particle.
    ExpireFeedback(Entity),
    /// One note of the combo arpeggio.
    ComboNote { index: u8, multiplier: u8 },
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired(pub ScheduledEvent);

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_ms: u64,
    seq: u64,
    event: ScheduledEvent,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest (due, seq) first.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Pending {
            due_ms: now_ms.saturating_add(delay_ms),
            seq,
            event,
        });
    }

    /// Pop the earliest event due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<ScheduledEvent> {
        if self.heap.peek()?.due_ms > now_ms {
            return None;
        }
        self.heap.pop().map(|p| p.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Scheduler>()
        .add_message::<TimerFired>()
        .add_systems(Update, dispatch_timers.in_set(FrameSet::Timers));
}

/// Publish every timer that has come due this frame, earliest first.
pub fn dispatch_timers(
    clock: Res<SessionClock>,
    mut scheduler: ResMut<Scheduler>,
    mut fired: MessageWriter<TimerFired>,
) {
    let now = clock.now_ms();
    while let Some(event) = scheduler.pop_due(now) {
        fired.write(TimerFired(event));
    }
}
