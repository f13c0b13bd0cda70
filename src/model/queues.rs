// src/model/queues.rs

use serde::Serialize;
use std::collections::VecDeque;

/// Incoming deliveries indexed by days-until-arrival.
///
/// Slot 0 arrives today. The length never changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPipeline {
    slots: VecDeque<u32>,
}

impl DeliveryPipeline {
    pub fn new(length: usize) -> Self {
        // Pre-fill with 0s so the pipe is the full lead-time length from day one
        Self {
            slots: VecDeque::from(vec![0; length]),
        }
    }

    pub fn from_slots(slots: Vec<u32>) -> Self {
        Self {
            slots: VecDeque::from(slots),
        }
    }

    /// Pops today's arrival and appends an empty slot at the far end.
    /// Call this at the START of the day.
    pub fn receive(&mut self) -> u32 {
        let arrived = self.slots.pop_front().unwrap_or(0);
        self.slots.push_back(0);
        arrived
    }

    /// Adds `quantity` to the delivery arriving in `lead_time` days.
    /// Orders landing on the same day combine.
    pub fn schedule(&mut self, lead_time: usize, quantity: u32) {
        if quantity == 0 || lead_time == 0 {
            return;
        }
        if let Some(slot) = self.slots.get_mut(lead_time - 1) {
            *slot = slot.saturating_add(quantity);
        }
    }

    /// Everything ordered but not yet arrived.
    pub fn total(&self) -> u64 {
        self.slots.iter().map(|&q| u64::from(q)).sum()
    }

    pub fn mean(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.total() as f64 / self.slots.len() as f64
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_shifts_and_keeps_length() {
        let mut pipeline = DeliveryPipeline::from_slots(vec![10, 20, 30]);
        assert_eq!(pipeline.receive(), 10);
        assert_eq!(pipeline.slots().collect::<Vec<_>>(), vec![20, 30, 0]);
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn test_schedule_is_additive() {
        let mut pipeline = DeliveryPipeline::new(5);
        pipeline.schedule(2, 40);
        pipeline.schedule(2, 60);
        pipeline.schedule(5, 7);
        assert_eq!(pipeline.slots().collect::<Vec<_>>(), vec![0, 100, 0, 0, 7]);
        assert_eq!(pipeline.total(), 107);
    }

    #[test]
    fn test_zero_quantity_is_not_scheduled() {
        let mut pipeline = DeliveryPipeline::new(3);
        pipeline.schedule(1, 0);
        assert_eq!(pipeline.total(), 0);
    }

    #[test]
    fn test_mean_over_all_slots() {
        let pipeline = DeliveryPipeline::from_slots(vec![0, 100, 0, 0, 0]);
        assert_eq!(pipeline.mean(), 20.0);
        assert_eq!(DeliveryPipeline::new(0).mean(), 0.0);
    }
}
