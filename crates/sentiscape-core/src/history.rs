use crate::params::SentimentClass;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmotionSample {
    /// Engine clock in seconds when the sample was recorded.
    pub timestamp: f64,
    pub score: f32,
    pub class: SentimentClass,
}

/// Bounded, append-only sentiment trail; the oldest sample drops past capacity.
#[derive(Clone, Debug)]
pub struct EmotionHistory {
    samples: VecDeque<EmotionSample>,
    capacity: usize,
}

impl EmotionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: EmotionSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&EmotionSample> {
        self.samples.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &EmotionSample> + '_ {
        self.samples.iter()
    }
}
