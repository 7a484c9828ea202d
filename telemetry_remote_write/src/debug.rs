use std::fmt::Write;

use crate::encoding::proto::WriteRequest;
use crate::sanitize::format_float;

/// What happened to a single batch.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BatchStats {
    pub measurements: usize,
    pub samples: usize,
    pub warnings: usize,
    pub series: usize,
    pub payload_bytes: usize,
}

impl BatchStats {
    // Log a summary of the batch
    pub fn publish(&self) {
        log::debug!(
            "Debug: measurements {} | samples {} (warnings {}) | series {} | bytes {}",
            self.measurements,
            self.samples,
            self.warnings,
            self.series,
            self.payload_bytes
        );
    }
}

/// Renders a write request as exposition-style text, one `name{labels} value` line per sample.
pub fn render_text(request: &WriteRequest) -> String {
    let mut out = String::new();
    for series in &request.timeseries {
        let mut name = "";
        let mut labels = Vec::with_capacity(series.labels.len());
        for label in &series.labels {
            if label.name == "__name__" {
                name = &label.value;
            } else {
                labels.push(format!("{}={:?}", label.name, label.value));
            }
        }
        for sample in &series.samples {
            out.push_str(name);
            if !labels.is_empty() {
                let _ = write!(out, "{{{}}}", labels.join(", "));
            }
            let _ = writeln!(out, " {}", format_float(sample.value));
        }
    }
    out
}
