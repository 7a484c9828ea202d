use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Write;

/// A set of label pairs, kept sorted by label name with at most one value per name.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LabelSet(Vec<(String, String)>);

impl LabelSet {
    pub fn new() -> Self {
        LabelSet(Vec::new())
    }

    /// Adds a label unless one with the same name is already present.
    ///
    /// Returns whether the label was added.
    pub fn insert(&mut self, name: String, value: String) -> bool {
        match self.0.binary_search_by(|(key, _)| key.as_str().cmp(&name)) {
            Ok(_) => false,
            Err(index) => {
                self.0.insert(index, (name, value));
                true
            }
        }
    }

    /// Returns a copy of the set with `name` set to `value`, replacing any previous value.
    pub fn with(&self, name: &str, value: String) -> LabelSet {
        let mut labels = self.clone();
        match labels.0.binary_search_by(|(key, _)| key.as_str().cmp(name)) {
            Ok(index) => labels.0[index].1 = value,
            Err(index) => labels.0.insert(index, (name.to_owned(), value)),
        }
        labels
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .binary_search_by(|(key, _)| key.as_str().cmp(name))
            .ok()
            .map(|index| self.0[index].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a sample's value came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    /// Read directly from a measurement field.
    Observed,
    /// Derived from another field, e.g. the `+Inf` bucket of a histogram's `_count`.
    Inferred,
    /// A zero placeholder for a series that a histogram or summary must always include.
    Default,
}

/// A single observation of one series.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub name: String,
    pub labels: LabelSet,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub origin: Origin,
}

impl Sample {
    pub fn key(&self) -> SeriesKey {
        SeriesKey(canonical_key(&self.name, self.labels.iter()))
    }
}

/// Identifies a series within a batch.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SeriesKey(String);

/// Serializes a series name and an unordered collection of labels into a stable string.
///
/// Labels are sorted by name (then value) and each component is quoted, so distinct
/// series can't collide regardless of the characters they contain.
pub fn canonical_key<'a>(name: &str, labels: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut labels = labels.into_iter().collect::<Vec<_>>();
    labels.sort_unstable();

    let mut key = String::with_capacity(name.len() + 2 + labels.len() * 16);
    let _ = write!(key, "{:?}{{", name);
    for (label, value) in labels {
        let _ = write!(key, "{:?}={:?},", label, value);
    }
    key.push('}');
    key
}

/// Merges the samples of a batch so that each series keeps a single authoritative value.
#[derive(Debug, Default)]
pub struct Accumulator {
    index: HashMap<SeriesKey, usize>,
    entries: Vec<Sample>,
}

impl Accumulator {
    pub fn new() -> Self {
        Accumulator::default()
    }

    /// Adds a sample to the batch, returning whether it is now the series' value.
    ///
    /// Default placeholders only fill series which have no value yet and give way to any
    /// other sample. Otherwise the strictly newer sample wins; ties keep the first one seen.
    pub fn push(&mut self, sample: Sample) -> bool {
        let key = sample.key();
        match self.index.get(&key) {
            Some(&index) => {
                let current = &mut self.entries[index];
                let replace = match (sample.origin, current.origin) {
                    (Origin::Default, _) => false,
                    (_, Origin::Default) => true,
                    _ => sample.timestamp > current.timestamp,
                };
                if replace {
                    *current = sample;
                }
                replace
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(sample);
                true
            }
        }
    }

    pub fn get(&self, key: &SeriesKey) -> Option<&Sample> {
        self.index.get(key).map(|&index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the accumulated series in the order they were first seen.
    pub fn into_entries(self) -> Vec<Sample> {
        self.entries
    }
}

impl Extend<Sample> for Accumulator {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, samples: I) {
        for sample in samples {
            self.push(sample);
        }
    }
}

/// Accumulates a stream of samples in order.
pub fn accumulate(samples: impl IntoIterator<Item = Sample>) -> Accumulator {
    let mut accumulator = Accumulator::new();
    accumulator.extend(samples);
    accumulator
}

/// Sorts series by name, then by their labels, when `enabled`.
pub fn order(mut entries: Vec<Sample>, enabled: bool) -> Vec<Sample> {
    if enabled {
        entries.sort_by(|lhs, rhs| {
            lhs.name
                .as_bytes()
                .cmp(rhs.name.as_bytes())
                .then_with(|| lhs.labels.cmp(&rhs.labels))
        });
    }
    entries
}
