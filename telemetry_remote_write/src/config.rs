use anyhow::Result;

/// Host-provided options for the remote write serializer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Sort series by name and labels so that output is reproducible.
    /// Off by default, since sorting costs throughput.
    pub sort_metrics: bool,

    /// Turn string fields into labels rather than rejecting them as bad samples.
    pub string_as_label: bool,
}

impl Config {
    /// Loads configuration from the environment (and a `.env` file, if present).
    ///
    /// Reads `SORT_METRICS` and `STRING_AS_LABEL`.
    pub fn from_env() -> Result<Config> {
        dotenv::dotenv().ok();
        Ok(Config {
            sort_metrics: parse_flag("SORT_METRICS", dotenv::var("SORT_METRICS").ok())?,
            string_as_label: parse_flag("STRING_AS_LABEL", dotenv::var("STRING_AS_LABEL").ok())?,
        })
    }
}

fn parse_flag(key: &str, val: Option<String>) -> Result<bool> {
    match val.as_deref() {
        Some("true") | Some("on") | Some("1") => Ok(true),
        Some("false") | Some("off") | Some("0") | Some("") | None => Ok(false),
        Some(val) => Err(anyhow::format_err!("invalid {}: {:?}", key, val)),
    }
}
