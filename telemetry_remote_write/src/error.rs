use thiserror::Error;

/// A failure which aborts a whole batch; no partial payload is produced.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to encode write request")]
    Encoding(#[source] prost::EncodeError),
    #[error("failed to compress write request body")]
    Compression(#[source] snap::Error),
    #[error("failed to decompress write request body")]
    Decompression(#[source] snap::Error),
    #[error("failed to decode write request")]
    Decoding(#[source] prost::DecodeError),
}

/// A per-field problem; the affected sample is dropped and the batch continues.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Warning {
    #[error("failed to parse metric name {0:?}")]
    MetricName(String),
    #[error("failed to parse label name {0:?}")]
    LabelName(String),
    #[error("bad sample for {name:?}: unsupported {kind} value")]
    BadSample { name: String, kind: &'static str },
    #[error("failed to parse {label} label value {value:?} for {name:?}")]
    BadLabelValue {
        name: String,
        label: &'static str,
        value: String,
    },
}
