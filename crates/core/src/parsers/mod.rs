pub mod chrome;

use thiserror::Error;

use crate::model::TraceData;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("chrome: {0}")]
    Chrome(#[from] chrome::ChromeParseError),
    #[error("unable to detect trace format")]
    UnknownFormat,
}

/// Detect the trace format and extract the per-track slices.
///
/// Only Chrome traces carry the events the tracks need: either an object
/// with `traceEvents`, or a bare array of events carrying `ph`.
pub fn parse_trace(data: &[u8]) -> Result<TraceData, ParseError> {
    let value: serde_json::Value =
        serde_json::from_slice(data).map_err(chrome::ChromeParseError::from)?;
    let is_chrome = match &value {
        serde_json::Value::Object(obj) => obj.contains_key("traceEvents"),
        serde_json::Value::Array(arr) => arr.iter().any(|v| v.get("ph").is_some()),
        _ => false,
    };
    if !is_chrome {
        return Err(ParseError::UnknownFormat);
    }
    Ok(chrome::parse_chrome_value(value)?)
}
