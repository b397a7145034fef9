//! Process-wide decision counters
//!
//! Counters are plain atomics registered by name, so checks running on
//! different tasks never contend on anything but the first registration.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

pub const ALLOWED: &str = "guard.allowed";
pub const DENIED: &str = "guard.denied";
pub const FAULTS: &str = "guard.faults";

/// A counter metric that can only increase
#[derive(Clone)]
pub struct Counter {
    name: String,
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn increment(&self) {
        self.add(1);
    }

    pub fn add(&self, value: u64) {
        let old = self.value.fetch_add(value, Ordering::Relaxed);
        debug!(
            metric = "counter",
            name = %self.name,
            value = value,
            total = old + value,
            "Counter incremented"
        );
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Registry of named counters
pub struct Metrics {
    counters: RwLock<HashMap<String, Counter>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create a counter
    pub fn counter(&self, name: &str) -> Counter {
        if let Ok(counters) = self.counters.read()
            && let Some(counter) = counters.get(name)
        {
            return counter.clone();
        }

        match self.counters.write() {
            Ok(mut counters) => counters
                .entry(name.to_string())
                .or_insert_with(|| Counter::new(name))
                .clone(),
            Err(_) => Counter::new(name),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_METRICS: Metrics = Metrics::new();
}

/// Get or create a global counter
pub fn counter(name: &str) -> Counter {
    GLOBAL_METRICS.counter(name)
}

pub fn global() -> &'static Metrics {
    &GLOBAL_METRICS
}
