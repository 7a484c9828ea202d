use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Measurements with this name carry field keys which are already complete metric names
/// (e.g. the output of a scraped "/metrics" endpoint).
pub const PROMETHEUS_MEASUREMENT: &str = "prometheus";

/// The metric semantic declared by the collector of a measurement.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MetricType {
    #[default]
    Untyped,
    Counter,
    Gauge,
    Histogram,
    Summary,
}

impl MetricType {
    pub fn as_str(&self) -> &str {
        match self {
            MetricType::Untyped => "untyped",
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Histogram => "histogram",
            MetricType::Summary => "summary",
        }
    }
}

impl FromStr for MetricType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "untyped" => Ok(MetricType::Untyped),
            "counter" => Ok(MetricType::Counter),
            "gauge" => Ok(MetricType::Gauge),
            "histogram" => Ok(MetricType::Histogram),
            "summary" => Ok(MetricType::Summary),
            _ => Err(()),
        }
    }
}

/// A single field value of a measurement.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    F64(f64),
    I64(i64),
    U64(u64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Coerces the value to a sample value; booleans become 0 or 1.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F64(val) => Some(val),
            Value::I64(val) => Some(val as f64),
            Value::U64(val) => Some(val as f64),
            Value::Bool(val) => Some(if val { 1.0 } else { 0.0 }),
            Value::Str(_) => None,
        }
    }

    /// Coerces the value to a cumulative count, as used by histogram buckets and `_count` fields.
    ///
    /// Negative and non-finite values are not counts; fractional floats are truncated.
    pub fn as_count(&self) -> Option<u64> {
        match *self {
            Value::F64(val) if val.is_finite() && val >= 0.0 => Some(val as u64),
            Value::F64(_) => None,
            Value::I64(val) => u64::try_from(val).ok(),
            Value::U64(val) => Some(val),
            Value::Bool(val) => Some(val as u64),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(val) => Some(val),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::F64(_) => "float",
            Value::I64(_) => "integer",
            Value::U64(_) => "unsigned",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
        }
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

impl From<u64> for Value {
    fn from(val: u64) -> Self {
        Value::U64(val)
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Str(val.to_owned())
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Str(val)
    }
}

/// A tagged, time-stamped group of field values handed over by the collector.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub metric_type: MetricType,
}

impl Measurement {
    pub fn new(name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Measurement {
            name: name.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp,
            metric_type: MetricType::default(),
        }
    }

    pub fn with_type(mut self, metric_type: MetricType) -> Self {
        self.metric_type = metric_type;
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get_tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|val| val.as_str())
    }
}
