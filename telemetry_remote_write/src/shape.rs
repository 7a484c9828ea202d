//! Expands measurements into samples according to their declared metric type.

use crate::encoding::NAME_LABEL;
use crate::error::Warning;
use crate::measurement::{Measurement, MetricType, Value};
use crate::sanitize::{format_float, metric_name, sanitize_label_name, sanitize_metric_name};
use crate::series::{LabelSet, Origin, Sample};

const BUCKET_LABEL: &str = "le";
const QUANTILE_LABEL: &str = "quantile";

/// The samples produced from one measurement along with any recoverable problems.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shaped {
    pub samples: Vec<Sample>,
    pub warnings: Vec<Warning>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Suffix {
    Bucket,
    Sum,
    Count,
}

impl Suffix {
    fn as_str(&self) -> &'static str {
        match self {
            Suffix::Bucket => "_bucket",
            Suffix::Sum => "_sum",
            Suffix::Count => "_count",
        }
    }

    /// Splits `http_request_duration_seconds_sum` into its base and suffix.
    fn split(field: &str) -> Option<(&str, Suffix)> {
        [Suffix::Bucket, Suffix::Sum, Suffix::Count]
            .iter()
            .find_map(|suffix| field.strip_suffix(suffix.as_str()).map(|base| (base, *suffix)))
    }
}

/// Expands measurements into samples.
#[derive(Copy, Clone, Debug, Default)]
pub struct Shaper {
    string_as_label: bool,
}

impl Shaper {
    /// When `string_as_label` is set, string fields become labels instead of being rejected.
    pub fn new(string_as_label: bool) -> Self {
        Shaper { string_as_label }
    }

    pub fn shape(&self, measurement: &Measurement) -> Shaped {
        let mut out = Shaped::default();
        if measurement.fields.is_empty() {
            return out;
        }

        let labels = self.common_labels(measurement, &mut out.warnings);
        match measurement.metric_type {
            MetricType::Untyped | MetricType::Counter | MetricType::Gauge => {
                self.shape_values(measurement, &labels, &mut out)
            }
            MetricType::Histogram => self.shape_histogram(measurement, &labels, &mut out),
            MetricType::Summary => self.shape_summary(measurement, &labels, &mut out),
        }
        out
    }

    /// Collects the labels shared by every sample of the measurement.
    ///
    /// Tags are added before string fields, so a tag wins over a field of the same name.
    /// `__name__` belongs to the series name and is never taken from a tag or field.
    fn common_labels(&self, measurement: &Measurement, warnings: &mut Vec<Warning>) -> LabelSet {
        let reserved = match measurement.metric_type {
            MetricType::Histogram => Some(BUCKET_LABEL),
            MetricType::Summary => Some(QUANTILE_LABEL),
            _ => None,
        };

        let mut labels = LabelSet::new();
        let tags = measurement
            .tags
            .iter()
            .filter(|(key, _)| Some(key.as_str()) != reserved)
            .map(|(key, value)| (key, value.as_str()));
        let strings = measurement
            .fields
            .iter()
            .filter(|_| self.string_as_label)
            .filter_map(|(key, value)| value.as_str().map(|value| (key, value)));
        for (key, value) in tags.chain(strings) {
            match sanitize_label_name(key) {
                Ok(Some(name)) if name == NAME_LABEL => {
                    warnings.push(Warning::LabelName(key.to_owned()))
                }
                Ok(Some(name)) => {
                    labels.insert(name, value.to_owned());
                }
                Ok(None) => (),
                Err(warning) => warnings.push(warning),
            }
        }
        labels
    }

    /// The fields which hold sample values.
    fn value_fields<'m>(
        &self,
        measurement: &'m Measurement,
    ) -> impl Iterator<Item = (&'m String, &'m Value)> {
        let string_as_label = self.string_as_label;
        measurement
            .fields
            .iter()
            .filter(move |(_, value)| !(string_as_label && matches!(value, Value::Str(_))))
    }

    fn shape_values(&self, measurement: &Measurement, labels: &LabelSet, out: &mut Shaped) {
        for (key, value) in self.value_fields(measurement) {
            let name = match sanitize_metric_name(&metric_name(&measurement.name, key)) {
                Ok(name) => name,
                Err(warning) => {
                    out.warnings.push(warning);
                    continue;
                }
            };
            match value.as_f64() {
                Some(value) => out.push(measurement, name, labels.clone(), value, Origin::Observed),
                None => out.warnings.push(bad_sample(name, value)),
            }
        }
    }

    fn shape_histogram(&self, measurement: &Measurement, labels: &LabelSet, out: &mut Shaped) {
        for (key, value) in self.value_fields(measurement) {
            let (field, suffix) = match Suffix::split(key) {
                Some(split) => split,
                None => continue,
            };
            let base = match sanitize_metric_name(&metric_name(&measurement.name, field)) {
                Ok(base) => base,
                Err(warning) => {
                    out.warnings.push(warning);
                    continue;
                }
            };
            out.push_defaults(measurement, &base, labels);

            let name = format!("{}{}", base, suffix.as_str());
            match suffix {
                Suffix::Bucket => {
                    let bound = match measurement.get_tag(BUCKET_LABEL) {
                        Some(bound) => bound,
                        None => continue,
                    };
                    let bound = match bound.parse::<f64>() {
                        Ok(bound) => bound,
                        Err(_) => {
                            out.warnings.push(bad_label_value(name, BUCKET_LABEL, bound));
                            continue;
                        }
                    };
                    match value.as_count() {
                        Some(count) => {
                            let labels = labels.with(BUCKET_LABEL, format_float(bound));
                            out.push(measurement, name, labels, count as f64, Origin::Observed);
                        }
                        None => out.warnings.push(bad_sample(name, value)),
                    }
                }
                Suffix::Sum => match value.as_f64() {
                    Some(sum) => out.push(measurement, name, labels.clone(), sum, Origin::Observed),
                    None => out.warnings.push(bad_sample(name, value)),
                },
                Suffix::Count => match value.as_count() {
                    Some(count) => {
                        let inf = labels.with(BUCKET_LABEL, format_float(f64::INFINITY));
                        let bucket = format!("{}{}", base, Suffix::Bucket.as_str());
                        out.push(measurement, bucket, inf, count as f64, Origin::Inferred);
                        out.push(measurement, name, labels.clone(), count as f64, Origin::Observed);
                    }
                    None => out.warnings.push(bad_sample(name, value)),
                },
            }
        }
    }

    fn shape_summary(&self, measurement: &Measurement, labels: &LabelSet, out: &mut Shaped) {
        for (key, value) in self.value_fields(measurement) {
            let suffix = Suffix::split(key).filter(|(_, suffix)| *suffix != Suffix::Bucket);
            let quantile = match suffix {
                Some(_) => None,
                None => match measurement.get_tag(QUANTILE_LABEL) {
                    Some(quantile) => Some(quantile),
                    None => continue,
                },
            };
            let field = suffix.map(|(field, _)| field).unwrap_or(key.as_str());
            let base = match sanitize_metric_name(&metric_name(&measurement.name, field)) {
                Ok(base) => base,
                Err(warning) => {
                    out.warnings.push(warning);
                    continue;
                }
            };

            match (suffix, quantile) {
                (Some((_, suffix)), _) => {
                    let name = format!("{}{}", base, suffix.as_str());
                    let coerced = match suffix {
                        Suffix::Count => value.as_count().map(|count| count as f64),
                        _ => value.as_f64(),
                    };
                    match coerced {
                        Some(val) => out.push(measurement, name, labels.clone(), val, Origin::Observed),
                        None => out.warnings.push(bad_sample(name, value)),
                    }
                }
                (None, Some(quantile)) => {
                    let quantile = match quantile.parse::<f64>() {
                        Ok(parsed) => parsed,
                        Err(_) => {
                            out.warnings.push(bad_label_value(base, QUANTILE_LABEL, quantile));
                            continue;
                        }
                    };
                    match value.as_f64() {
                        Some(val) => {
                            let labels = labels.with(QUANTILE_LABEL, format_float(quantile));
                            out.push(measurement, base, labels, val, Origin::Observed);
                        }
                        None => out.warnings.push(bad_sample(base, value)),
                    }
                }
                (None, None) => (),
            }
        }
    }
}

impl Shaped {
    fn push(
        &mut self,
        measurement: &Measurement,
        name: String,
        labels: LabelSet,
        value: f64,
        origin: Origin,
    ) {
        self.samples.push(Sample {
            name,
            labels,
            value,
            timestamp: measurement.timestamp,
            origin,
        });
    }

    /// Registers the zero-valued series every histogram group reports, so they're
    /// present even when the collector didn't send them.
    fn push_defaults(&mut self, measurement: &Measurement, base: &str, labels: &LabelSet) {
        for suffix in &[Suffix::Sum, Suffix::Count] {
            let name = format!("{}{}", base, suffix.as_str());
            self.push(measurement, name, labels.clone(), 0.0, Origin::Default);
        }
        let name = format!("{}{}", base, Suffix::Bucket.as_str());
        let labels = labels.with(BUCKET_LABEL, format_float(f64::INFINITY));
        self.push(measurement, name, labels, 0.0, Origin::Default);
    }
}

fn bad_sample(name: String, value: &Value) -> Warning {
    Warning::BadSample {
        name,
        kind: value.type_name(),
    }
}

fn bad_label_value(name: String, label: &'static str, value: &str) -> Warning {
    Warning::BadLabelValue {
        name,
        label,
        value: value.to_owned(),
    }
}
