use crate::error::Warning;
use crate::measurement::PROMETHEUS_MEASUREMENT;

fn is_metric_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == ':'
}

// Colons are reserved for recording rules, so they're never valid in label names.
fn is_label_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn replace_invalid(raw: &str, is_valid: fn(char) -> bool) -> String {
    raw.chars()
        .map(|ch| if is_valid(ch) { ch } else { '_' })
        .collect()
}

/// Whether a substituted name still identifies something, i.e. it isn't empty
/// or only underscores and doesn't begin with a digit.
fn is_identifier(name: &str) -> bool {
    match name.chars().next() {
        Some(first) if !first.is_ascii_digit() => name.chars().any(|ch| ch != '_'),
        _ => false,
    }
}

/// Replaces characters which aren't allowed in a series name (`[A-Za-z_:][A-Za-z0-9_:]*`).
pub fn sanitize_metric_name(raw: &str) -> Result<String, Warning> {
    let name = replace_invalid(raw, is_metric_char);
    if is_identifier(&name) {
        Ok(name)
    } else {
        Err(Warning::MetricName(raw.to_owned()))
    }
}

/// Replaces characters which aren't allowed in a label name (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// Returns `Ok(None)` for names without any content; such labels are dropped rather than renamed.
pub fn sanitize_label_name(raw: &str) -> Result<Option<String>, Warning> {
    let name = replace_invalid(raw, is_label_char);
    if name.chars().all(|ch| ch == '_') {
        Ok(None)
    } else if is_identifier(&name) {
        Ok(Some(name))
    } else {
        Err(Warning::LabelName(raw.to_owned()))
    }
}

/// Builds the unsanitized series name for a measurement field.
pub fn metric_name(measurement: &str, field: &str) -> String {
    if measurement == PROMETHEUS_MEASUREMENT {
        field.to_owned()
    } else if field.is_empty() {
        measurement.to_owned()
    } else {
        format!("{}_{}", measurement, field)
    }
}

/// Formats a bucket bound or quantile the way it's written in the exposition format.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value == f64::INFINITY {
        "+Inf".to_owned()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_owned()
    } else {
        value.to_string()
    }
}
