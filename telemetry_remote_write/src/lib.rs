//! # Telemetry Remote Write
//!
//! Converts batches of tagged measurements into Prometheus remote write payloads.
//!
//! Each measurement is expanded into samples according to its metric type, samples
//! are merged into one value per series, and the series are encoded as a snappy
//! compressed `WriteRequest`. Problems with individual fields are reported to a
//! [`WarningSink`] and never fail the batch; only encoding failures do.
//!

pub mod config;
pub mod debug;
pub mod encoding;
pub mod error;
pub mod measurement;
pub mod sanitize;
pub mod series;
pub mod shape;
pub mod sink;

use anyhow::Result as AnyResult;
use std::sync::Arc;

pub use crate::config::Config;
pub use crate::debug::BatchStats;
pub use crate::error::{Error, Warning};
pub use crate::measurement::{Measurement, MetricType, Value, PROMETHEUS_MEASUREMENT};
pub use crate::sink::{CaptureSink, LogSink, WarningSink};

use crate::series::{order, Accumulator};
use crate::shape::Shaper;

/// Serializes measurements into remote write request bodies.
///
/// A serializer keeps no state between calls, so it can be shared between threads.
pub struct Serializer {
    config: Config,
    sink: Arc<dyn WarningSink>,
}

impl Serializer {
    /// Creates a serializer which logs warnings through the `log` facade.
    pub fn new(config: Config) -> Self {
        Serializer::with_sink(config, Arc::new(LogSink))
    }

    pub fn with_sink(config: Config, sink: Arc<dyn WarningSink>) -> Self {
        Serializer { config, sink }
    }

    /// Creates a serializer configured from environment variables.
    pub fn from_env() -> AnyResult<Self> {
        Ok(Serializer::new(Config::from_env()?))
    }

    pub fn serialize(&self, measurement: &Measurement) -> Result<Vec<u8>, Error> {
        self.serialize_batch(std::slice::from_ref(measurement))
    }

    pub fn serialize_batch(&self, measurements: &[Measurement]) -> Result<Vec<u8>, Error> {
        self.serialize_batch_with_stats(measurements)
            .map(|(payload, _)| payload)
    }

    /// Serializes a batch, also returning a summary of what happened to it.
    pub fn serialize_batch_with_stats(
        &self,
        measurements: &[Measurement],
    ) -> Result<(Vec<u8>, BatchStats), Error> {
        let shaper = Shaper::new(self.config.string_as_label);
        let mut stats = BatchStats {
            measurements: measurements.len(),
            ..BatchStats::default()
        };

        // Expand each measurement and merge its samples into the batch
        let mut accumulator = Accumulator::new();
        for measurement in measurements {
            let shaped = shaper.shape(measurement);
            for warning in &shaped.warnings {
                self.sink.record(&warning.to_string());
            }
            stats.warnings += shaped.warnings.len();
            stats.samples += shaped.samples.len();
            accumulator.extend(shaped.samples);
        }

        let entries = order(accumulator.into_entries(), self.config.sort_metrics);
        stats.series = entries.len();
        let payload = encoding::encode_and_compress(&entries)?;
        stats.payload_bytes = payload.len();
        stats.publish();
        Ok((payload, stats))
    }
}
