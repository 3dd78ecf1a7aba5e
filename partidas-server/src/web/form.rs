//! Request body parsing for the POST endpoints.
//!
//! HTML forms send repeated keys (`type=IC&type=ALFA`) that a plain struct
//! extractor cannot collect, so bodies are parsed into an ordered list of
//! fields here. JSON bodies are accepted too: an object whose values are
//! strings, numbers, or arrays of them.

use axum::body::Bytes;
use axum::http::{HeaderMap, header};
use serde_json::Value;

use super::routes::AppError;

/// Fields of a request body, in order of appearance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    /// Parse a body according to its `Content-Type`.
    pub fn from_request(headers: &HeaderMap, body: &Bytes) -> Result<Self, AppError> {
        let is_json = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            Self::from_json(body)
        } else {
            Ok(Self::from_urlencoded(body))
        }
    }

    /// Invalid UTF-8 in a field decodes lossily.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let fields = form_urlencoded::parse(body)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { fields }
    }

    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        })?;
        let Value::Object(map) = value else {
            return Err(AppError::BadRequest {
                message: "expected a JSON object".to_string(),
            });
        };

        let mut fields = Vec::new();
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    for item in items {
                        fields.push((key.clone(), scalar(&key, item)?));
                    }
                }
                Value::Null => {}
                other => fields.push((key.clone(), scalar(&key, other)?)),
            }
        }
        Ok(Self { fields })
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, or a 400.
    pub fn require(&self, key: &str) -> Result<&str, AppError> {
        self.get(key).ok_or_else(|| AppError::BadRequest {
            message: format!("missing field: {key}"),
        })
    }

    /// Every value for `key`, in order.
    pub fn all(&self, key: &str) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn scalar(key: &str, value: Value) -> Result<String, AppError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(AppError::BadRequest {
            message: format!("unsupported value for field: {key}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn repeated_keys_kept_in_order() {
        let form = FormFields::from_urlencoded(b"type=IC&type=URB%7CSUBUR&type=ALFA");
        let types: Vec<_> = form.all("type").collect();
        assert_eq!(types, vec!["IC", "URB|SUBUR", "ALFA"]);
    }

    #[test]
    fn plus_and_percent_decoding() {
        let form =
            FormFields::from_urlencoded(b"name=Lisboa+-+Santa+Apol%C3%B3nia&id=9431039");
        assert_eq!(form.get("name"), Some("Lisboa - Santa Apolónia"));
        assert_eq!(form.require("id").unwrap(), "9431039");
        assert!(form.require("distance").is_err());
    }

    #[test]
    fn empty_body_has_no_fields() {
        let form = FormFields::from_urlencoded(b"");
        assert_eq!(form.all("destination").count(), 0);
    }

    #[test]
    fn bare_keys_and_stray_percents() {
        let form = FormFields::from_urlencoded(b"destination&&destination=Faro&name=100%");
        assert_eq!(form.all("destination").collect::<Vec<_>>(), vec!["", "Faro"]);
        assert_eq!(form.get("name"), Some("100%"));
    }

    #[test]
    fn json_arrays_and_numbers() {
        let form =
            FormFields::from_json(br#"{"id": 9430007, "column": ["time", "operator"], "x": null}"#)
                .unwrap();
        assert_eq!(form.get("id"), Some("9430007"));
        assert_eq!(form.all("column").collect::<Vec<_>>(), vec!["time", "operator"]);
        assert_eq!(form.get("x"), None);
    }

    #[test]
    fn json_must_be_object() {
        assert!(FormFields::from_json(b"[1,2]").is_err());
        assert!(FormFields::from_json(b"{nope").is_err());
    }

    #[test]
    fn content_type_selects_parser() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let body = Bytes::from_static(br#"{"date": "2024-03-15"}"#);
        let form = FormFields::from_request(&headers, &body).unwrap();
        assert_eq!(form.get("date"), Some("2024-03-15"));

        let body = Bytes::from_static(b"date=2024-03-16");
        let form = FormFields::from_request(&HeaderMap::new(), &body).unwrap();
        assert_eq!(form.get("date"), Some("2024-03-16"));
    }
}
