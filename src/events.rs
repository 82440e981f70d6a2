//! Outbound event queue.
//!
//! The simulation never calls out to audio or UI code. It records what
//! happened and the host drains the queue after each frame.

use crate::vec::Vec2;
use crate::tier::Tier;
use alloc::collections::VecDeque;
use alloc::vec::Vec as AllocVec;

/// Something an outside collaborator may want to react to.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimEvent {
    /// The tip struck a target hard enough to be felt.
    Impact {
        position: Vec2<f32>,
        strength: f32,
        tier: Tier,
    },
    /// A target broke. `position` is the target's centre.
    Shatter {
        position: Vec2<f32>,
        strength: f32,
        tier: Tier,
        explosive: bool,
    },
}

impl SimEvent {
    pub fn strength(&self) -> f32 {
        match self {
            SimEvent::Impact { strength, .. } | SimEvent::Shatter { strength, .. } => *strength,
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            SimEvent::Impact { tier, .. } | SimEvent::Shatter { tier, .. } => *tier,
        }
    }
}

/// FIFO of events in emission order.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: VecDeque<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> AllocVec<SimEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.push(SimEvent::Impact { position: Vec2::new(1.0, 0.0), strength: 20.0, tier: Tier::Soft });
        queue.push(SimEvent::Shatter {
            position: Vec2::new(2.0, 0.0),
            strength: 40.0,
            tier: Tier::Explosive,
            explosive: true,
        });

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].strength(), 20.0);
        assert_eq!(drained[1].tier(), Tier::Explosive);
        assert!(queue.is_empty());
    }
}
