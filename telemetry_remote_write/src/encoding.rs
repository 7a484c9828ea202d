//! # Wire Encoding: Remote Write
//!
//! Accumulated series are written as a Prometheus remote write `WriteRequest`,
//! serialized with protobuf and compressed with snappy's block format.
//!

use prost::Message;

use crate::error::Error;
use crate::series::Sample;

pub(crate) const NAME_LABEL: &str = "__name__";

/// Builds one time series record, holding a single sample, per accumulated entry.
pub fn to_write_request(entries: &[Sample]) -> proto::WriteRequest {
    let mut timeseries = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut labels = Vec::with_capacity(1 + entry.labels.len());
        labels.push(proto::Label {
            name: NAME_LABEL.into(),
            value: entry.name.clone(),
        });
        for (name, value) in entry.labels.iter() {
            labels.push(proto::Label {
                name: name.into(),
                value: value.into(),
            });
        }
        // Receivers expect labels sorted by name
        labels.sort_by(|a, b| a.name.cmp(&b.name));

        let samples = vec![proto::Sample {
            value: entry.value,
            timestamp: entry.timestamp.timestamp_millis(),
        }];
        timeseries.push(proto::TimeSeries { labels, samples });
    }
    proto::WriteRequest { timeseries }
}

/// Serializes and compresses the entries into a remote write request body.
pub fn encode_and_compress(entries: &[Sample]) -> Result<Vec<u8>, Error> {
    let request = to_write_request(entries);

    // Serialize request
    let mut bytes: Vec<u8> = Vec::with_capacity(request.encoded_len());
    request.encode(&mut bytes).map_err(Error::Encoding)?;

    // Compress request body
    let mut encoder = snap::raw::Encoder::new();
    encoder.compress_vec(&bytes).map_err(Error::Compression)
}

/// Decompresses and deserializes a remote write request body.
pub fn decode(payload: &[u8]) -> Result<proto::WriteRequest, Error> {
    let mut decoder = snap::raw::Decoder::new();
    let bytes = decoder
        .decompress_vec(payload)
        .map_err(Error::Decompression)?;
    proto::WriteRequest::decode(bytes.as_slice()).map_err(Error::Decoding)
}

/// The proto module defines the protobuf message structure.
///
/// The tags must match the `prometheus.WriteRequest` definition in `remote.proto`.
pub mod proto {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct Label {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(string, tag = "2")]
        pub value: String,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Sample {
        #[prost(double, tag = "1")]
        pub value: f64,
        #[prost(int64, tag = "2")]
        pub timestamp: i64,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct TimeSeries {
        #[prost(message, repeated, tag = "1")]
        pub labels: Vec<Label>,
        #[prost(message, repeated, tag = "2")]
        pub samples: Vec<Sample>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct WriteRequest {
        #[prost(message, repeated, tag = "1")]
        pub timeseries: Vec<TimeSeries>,
    }
}
