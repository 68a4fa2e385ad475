use log::trace;
use serde_json::{Map, Value};

use crate::NotificationError;

/// Encodes accumulated fields into a request body.
pub trait Encode {
    /// Serializes `fields` into the request body.
    fn encode(&self, fields: &Map<String, Value>) -> Result<String, NotificationError>;
}

/// Compact JSON encoder. <https://pushover.net/api#messages>
#[derive(Clone, Copy, Debug, Default)]
pub struct Json;

impl Encode for Json {
    fn encode(&self, fields: &Map<String, Value>) -> Result<String, NotificationError> {
        serde_json::to_string(fields).map_err(NotificationError::Serialize)
    }
}

/// Request document and its lazily encoded body.
#[derive(Debug, Default)]
pub(crate) struct Fields {
    document: Map<String, Value>,
    // cleared by every setter, even when the value does not change
    body: Option<String>,
}

impl Fields {
    /// Upserts `name`, or removes it when `value` is absent or empty.
    pub(crate) fn set_text(&mut self, name: &str, value: Option<&str>) {
        self.body = None;
        match value {
            Some(v) if !v.is_empty() => {
                self.document.insert(name.to_string(), Value::from(v));
            }
            _ => {
                self.document.remove(name);
            }
        }
    }

    pub(crate) fn set_number(&mut self, name: &str, value: i64) {
        self.body = None;
        self.document.insert(name.to_string(), Value::from(value));
    }

    pub(crate) fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Returns the cached body, encoding the document first if a setter ran since.
    pub(crate) fn body<E: Encode>(&mut self, encoder: &E) -> Result<&str, NotificationError> {
        let body = match self.body.take() {
            Some(body) => body,
            None => {
                let body = encoder.encode(&self.document)?;
                trace!("request body encoded, {} bytes", body.len());
                body
            }
        };
        Ok(self.body.insert(body).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    #[derive(Default)]
    struct Counting {
        calls: Cell<usize>,
    }

    impl Encode for Counting {
        fn encode(&self, fields: &Map<String, Value>) -> Result<String, NotificationError> {
            self.calls.set(self.calls.get() + 1);
            Json.encode(fields)
        }
    }

    #[test]
    fn t_set_and_clear() {
        let mut f = Fields::default();
        f.set_text("title", Some("title"));
        assert_eq!(Some(&Value::from("title")), f.document().get("title"));

        f.set_text("title", Some(""));
        assert!(f.document().get("title").is_none());

        f.set_text("title", Some("title"));
        f.set_text("title", None);
        assert!(f.document().get("title").is_none());

        // removing a key that was never set is fine
        f.set_text("device", None);
        assert!(f.document().is_empty());
    }

    #[test]
    fn t_last_write_wins() -> Result<(), NotificationError> {
        let mut f = Fields::default();
        f.set_text("message", Some("first"));
        f.set_text("message", Some("second"));
        f.set_number("priority", -2);
        f.set_number("priority", 1);
        assert_eq!(r#"{"message":"second","priority":1}"#, f.body(&Json)?);
        Ok(())
    }

    #[test]
    fn t_body_is_cached() -> Result<(), NotificationError> {
        let encoder = Counting::default();
        let mut f = Fields::default();
        f.set_text("token", Some("token"));

        let first = f.body(&encoder)?.to_string();
        let second = f.body(&encoder)?.to_string();
        assert_eq!(first, second);
        assert_eq!(1, encoder.calls.get());

        f.set_text("user", Some("user"));
        f.body(&encoder)?;
        assert_eq!(2, encoder.calls.get());
        Ok(())
    }

    #[test]
    fn t_unchanged_value_still_invalidates() -> Result<(), NotificationError> {
        let encoder = Counting::default();
        let mut f = Fields::default();
        f.set_number("timestamp", 1_600_000_000);
        f.body(&encoder)?;

        f.set_number("timestamp", 1_600_000_000);
        f.body(&encoder)?;
        f.set_text("sound", None);
        f.body(&encoder)?;
        assert_eq!(3, encoder.calls.get());
        Ok(())
    }

    #[test]
    fn t_numbers_are_json_numbers() -> Result<(), NotificationError> {
        let mut f = Fields::default();
        f.set_number("timestamp", 1_331_249_662);
        f.set_text("url", Some("https://pushover.net"));
        let parsed: Value = serde_json::from_str(f.body(&Json)?)?;
        assert_eq!(Some(1_331_249_662), parsed["timestamp"].as_i64());
        assert_eq!(Some("https://pushover.net"), parsed["url"].as_str());
        Ok(())
    }
}
