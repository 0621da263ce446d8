//! In-memory store for manually sampled readings

use std::collections::{BTreeMap, VecDeque};

use chrono::Utc;
use iotgw_core::SensorReading;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Acknowledgement returned by [`SampleStore::record`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleAck {
    /// Always `"sample_recorded"`
    pub status: String,
    /// The stored reading, timestamp included
    pub data: SensorReading,
    /// Number of stored samples after this one
    pub count: usize,
}

/// Per-field statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Summary over all stored samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Number of samples
    pub count: usize,
    /// Statistics for every field seen in at least one sample
    pub fields: BTreeMap<String, FieldStats>,
}

/// Samples retained when no capacity is configured
pub const DEFAULT_SAMPLE_CAPACITY: usize = 10_000;

/// Bounded in-memory sample buffer. Shared behind an `Arc`.
///
/// Once `capacity` samples are held, each new sample evicts the oldest.
/// Nothing is persisted.
#[derive(Debug)]
pub struct SampleStore {
    samples: RwLock<VecDeque<SensorReading>>,
    capacity: usize,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_CAPACITY)
    }

    /// Store holding at most `capacity` samples (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a reading, stamping the current time if it has none
    pub fn record(&self, reading: SensorReading) -> SampleAck {
        let reading = match reading.timestamp() {
            Some(_) => reading,
            None => reading.with_timestamp(Utc::now()),
        };

        let mut samples = self.samples.write();
        if samples.len() >= self.capacity {
            samples.pop_front();
            tracing::debug!(capacity = self.capacity, "Sample buffer full, evicted oldest");
        }
        samples.push_back(reading.clone());
        tracing::debug!(count = samples.len(), "Recorded sample");

        SampleAck {
            status: "sample_recorded".to_string(),
            data: reading,
            count: samples.len(),
        }
    }

    /// All samples in recording order
    pub fn list(&self) -> Vec<SensorReading> {
        self.samples.read().iter().cloned().collect()
    }

    /// Remove every sample, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut samples = self.samples.write();
        let removed = samples.len();
        samples.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }

    /// Statistics over the stored samples, `None` when empty
    pub fn summary(&self) -> Option<SampleSummary> {
        let samples = self.samples.read();
        if samples.is_empty() {
            return None;
        }

        let mut fields: BTreeMap<String, (usize, f64, f64, f64)> = BTreeMap::new();
        for (field, value) in samples.iter().flat_map(|s| s.iter()) {
            let entry = fields
                .entry(field.to_string())
                .or_insert((0, 0.0, f64::INFINITY, f64::NEG_INFINITY));
            entry.0 += 1;
            entry.1 += value;
            entry.2 = entry.2.min(value);
            entry.3 = entry.3.max(value);
        }

        Some(SampleSummary {
            count: samples.len(),
            fields: fields
                .into_iter()
                .map(|(field, (count, sum, min, max))| {
                    let stats = FieldStats {
                        count,
                        mean: sum / count as f64,
                        min,
                        max,
                    };
                    (field, stats)
                })
                .collect(),
        })
    }
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new()
    }
}
