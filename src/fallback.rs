use std::ops::Range;

use rand::Rng;
use tracing::warn;

use crate::counter::Counter;
use crate::metrics::{record_increment, record_store_failure, record_value};

pub const DEFAULT_FALLBACK_COUNT: u64 = 42;
pub const DEFAULT_SYNTHETIC_RANGE: Range<u64> = 50..150;

/// Values served while the store cannot be reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fallback {
    /// Answer for reads.
    pub count: u64,
    /// Increments answer with a value drawn from this range.
    pub synthetic: Range<u64>,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            count: DEFAULT_FALLBACK_COUNT,
            synthetic: DEFAULT_SYNTHETIC_RANGE,
        }
    }
}

impl Fallback {
    pub fn synthetic_count(&self) -> u64 {
        if self.synthetic.is_empty() {
            return self.synthetic.start;
        }
        rand::thread_rng().gen_range(self.synthetic.clone())
    }
}

/// Counter that always answers. Store failures stop here: they are logged,
/// counted, and replaced by the [`Fallback`] values.
#[derive(Clone)]
pub struct FallbackCounter {
    counter: Counter,
    fallback: Fallback,
}

impl FallbackCounter {
    pub fn new(counter: Counter, fallback: Fallback) -> Self {
        Self { counter, fallback }
    }

    pub async fn get(&self) -> u64 {
        match self.counter.get().await {
            Ok(count) => {
                record_value(count);
                count
            }
            Err(e) => {
                warn!(key = self.counter.key(), error = %e, "Store unavailable, serving fallback count");
                record_store_failure("get");
                self.fallback.count
            }
        }
    }

    pub async fn increment(&self) -> u64 {
        match self.counter.increment().await {
            Ok(count) => {
                record_increment(count);
                count
            }
            Err(e) => {
                warn!(key = self.counter.key(), error = %e, "Store unavailable, serving synthetic count");
                record_store_failure("increment");
                self.fallback.synthetic_count()
            }
        }
    }
}
