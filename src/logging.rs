//! Logging for requests sent to and responses received from the expense API.

use reqwest::{Method, StatusCode, Url};
use serde_json::Value;

/// Bodies longer than this many bytes are truncated at the `info` level and
/// logged in full at the `debug` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Replace every string value of the field `field_name` with asterisks, at any depth.
pub(crate) fn redact_value(value: &mut Value, field_name: &str) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key == field_name && field.is_string() {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_value(field, field_name);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                redact_value(item, field_name);
            }
        }
        _ => {}
    }
}

/// Redact the field `field_name` in `json_text`.
///
/// Text that is not JSON is returned unchanged.
pub(crate) fn redact_field(json_text: &str, field_name: &str) -> String {
    match serde_json::from_str::<Value>(json_text) {
        Ok(mut value) => {
            redact_value(&mut value, field_name);
            value.to_string()
        }
        Err(_) => json_text.to_owned(),
    }
}

fn truncate(body: &str) -> &str {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

pub(crate) fn log_request(method: &Method, url: &Url, body: Option<&Value>) {
    let body = body.map(|body| {
        let mut body = body.clone();
        redact_value(&mut body, "password");
        body.to_string()
    });

    match body.as_deref() {
        Some(body) if body.len() > LOG_BODY_LENGTH_LIMIT => {
            tracing::info!("Sending request: {method} {url}\nbody: {:}...", truncate(body));
            tracing::debug!("Full request body: {body:?}");
        }
        Some(body) => tracing::info!("Sending request: {method} {url}\nbody: {body:?}"),
        None => tracing::info!("Sending request: {method} {url}"),
    }
}

pub(crate) fn log_response(status: StatusCode, url: &Url, body: &str) {
    let body = redact_field(body, "token");

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received response: {status} from {url}\nbody: {:}...",
            truncate(&body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Received response: {status} from {url}\nbody: {body:?}");
    }
}
