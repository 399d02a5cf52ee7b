//! Injectable random source for battle and loot rolls.
//!
//! Every roll in the session goes through [`RealmRng`] so a seeded source
//! reproduces a whole session, and tests can script exact outcomes with
//! [`SequenceRng`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Random source used by the session store.
pub trait RealmRng {
    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[low, high]` (both inclusive).
    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        let span = (high - low + 1) as f64;
        let step = (self.next_unit() * span).floor() as i32;
        low + step.min(high - low)
    }

    /// Uniform float in `[0, max)`.
    fn uniform(&mut self, max: f64) -> f64 {
        self.next_unit() * max
    }

    /// Uniform index into a collection of `len` elements.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }
}

/// `StdRng`-backed source. Same seed, same session.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seed_from_u64(s),
            None => Self::from_entropy(),
        }
    }
}

impl RealmRng for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..=high)
    }
}

/// Replays a fixed list of unit rolls, then repeats `fallback` forever.
///
/// Values are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: VecDeque<f64>,
    fallback: f64,
}

impl SequenceRng {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self {
            values: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RealmRng for SequenceRng {
    fn next_unit(&mut self) -> f64 {
        let v = self.values.pop_front().unwrap_or(self.fallback);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
