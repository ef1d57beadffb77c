//! Single-line JSON rendering of errors
//!
//! Useful when an error should be attached to a log record as one field so
//! the whole chain stays on one log line.

use super::error::Result;
use super::record::ExceptionInfo;
use serde_json::{Map, Value};
use std::error::Error;

/// Errors that carry the body of a failed remote response
pub trait ResponseBody {
    fn response_body(&self) -> Option<String>;
}

fn traceback_text<E>(error: &E) -> String
where
    E: Error + 'static,
{
    ExceptionInfo::from_error(error).traceback.join("\n")
}

/// `{"traceback": "..."}` for any error
///
/// # Example
///
/// ```
/// use rust_structured_logging::core::error_report::error_to_json;
///
/// let err = "abc".parse::<u8>().unwrap_err();
/// let report = error_to_json(&err);
/// assert!(report["traceback"].as_str().unwrap().ends_with("ParseIntError: invalid digit found in string"));
/// ```
pub fn error_to_json<E>(error: &E) -> Value
where
    E: Error + 'static,
{
    let mut report = Map::new();
    report.insert("traceback".to_string(), Value::String(traceback_text(error)));
    Value::Object(report)
}

/// Like [`error_to_json`], adding `"response"` when the error carries a body
pub fn error_to_json_with_response<E>(error: &E) -> Value
where
    E: Error + ResponseBody + 'static,
{
    let mut report = error_to_json(error);
    if let (Value::Object(map), Some(body)) = (&mut report, error.response_body()) {
        map.insert("response".to_string(), Value::String(body));
    }
    report
}

/// [`error_to_json`] serialized to a compact string
pub fn error_to_json_string<E>(error: &E) -> Result<String>
where
    E: Error + 'static,
{
    Ok(serde_json::to_string(&error_to_json(error))?)
}

pub fn error_to_json_string_with_response<E>(error: &E) -> Result<String>
where
    E: Error + ResponseBody + 'static,
{
    Ok(serde_json::to_string(&error_to_json_with_response(error))?)
}
