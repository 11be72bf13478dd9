pub mod store;

use crate::models::Address;
use serde_json::{Map, Value};
use thiserror::Error;
pub use store::{AddressRepository, InMemoryAddressStore};

/// Checked in this order; the first one missing is the one reported.
const REQUIRED_FIELDS: [&str; 6] = ["firstName", "lastName", "address1", "city", "state", "zip"];

const ZIP_MIN: f64 = 10_000.0;
const ZIP_MAX: f64 = 99_999.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field \"{0}\"")]
    MissingField(&'static str),

    #[error("Field \"{0}\" must be a string")]
    NotAString(&'static str),

    #[error("Field \"state\" must be two characters length")]
    InvalidState,

    #[error("Field \"zip\" must be exactly 5 digit number")]
    InvalidZip,
}

/// A validated creation payload that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl NewAddress {
    /// Validates a decoded JSON object. Stops at the first failing check.
    pub fn from_payload(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        if let Some(field) = REQUIRED_FIELDS
            .into_iter()
            .find(|field| !body.get(*field).is_some_and(is_present))
        {
            return Err(ValidationError::MissingField(field));
        }

        let first_name = required_string(body, "firstName")?;
        let last_name = required_string(body, "lastName")?;
        let address1 = required_string(body, "address1")?;
        let city = required_string(body, "city")?;

        let address2 = match body.get("address2") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(ValidationError::NotAString("address2")),
        };

        let state = match &body["state"] {
            Value::String(s) if s.chars().count() == 2 => s.clone(),
            _ => return Err(ValidationError::InvalidState),
        };

        let zip = normalize_zip(&body["zip"])?;

        Ok(Self {
            first_name,
            last_name,
            address1,
            address2,
            city,
            state,
            zip,
        })
    }

    /// Attaches an identifier, producing the stored record.
    pub fn into_address(self, id: String) -> Address {
        Address {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            address1: self.address1,
            address2: self.address2,
            city: self.city,
            state: self.state,
            zip: self.zip,
        }
    }
}

/// JSON truthiness: null, false, 0 and "" all count as missing.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn required_string(body: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ValidationError::NotAString(field)),
    }
}

/// Accepts a JSON number or a numeric string. Strings are kept as sent,
/// numbers are stored as their integer text.
fn normalize_zip(value: &Value) -> Result<String, ValidationError> {
    let (numeric, text) = match value {
        Value::Number(n) => {
            let n = n.as_f64().ok_or(ValidationError::InvalidZip)?;
            (n, None)
        }
        Value::String(s) => {
            let n = s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidZip)?;
            (n, Some(s.clone()))
        }
        _ => return Err(ValidationError::InvalidZip),
    };

    if !numeric.is_finite() || numeric.fract() != 0.0 || !(ZIP_MIN..=ZIP_MAX).contains(&numeric) {
        return Err(ValidationError::InvalidZip);
    }

    Ok(text.unwrap_or_else(|| format!("{}", numeric as u32)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn valid() -> Value {
        json!({
            "firstName": "A",
            "lastName": "B",
            "address1": "1 Main",
            "city": "X",
            "state": "NY",
            "zip": "10001"
        })
    }

    fn with(field: &str, value: Value) -> Map<String, Value> {
        let mut body = payload(valid());
        body.insert(field.to_string(), value);
        body
    }

    #[test]
    fn accepts_minimal_payload() {
        let address = NewAddress::from_payload(&payload(valid())).unwrap();

        assert_eq!(address.first_name, "A");
        assert_eq!(address.last_name, "B");
        assert_eq!(address.address1, "1 Main");
        assert_eq!(address.address2, None);
        assert_eq!(address.city, "X");
        assert_eq!(address.state, "NY");
        assert_eq!(address.zip, "10001");
    }

    #[test]
    fn keeps_optional_address2() {
        let address = NewAddress::from_payload(&with("address2", json!("Apt 4"))).unwrap();
        assert_eq!(address.address2.as_deref(), Some("Apt 4"));

        let address = NewAddress::from_payload(&with("address2", Value::Null)).unwrap();
        assert_eq!(address.address2, None);
    }

    #[test]
    fn reports_each_missing_field() {
        for field in REQUIRED_FIELDS {
            let mut body = payload(valid());
            body.remove(field);

            assert_eq!(
                NewAddress::from_payload(&body),
                Err(ValidationError::MissingField(field)),
                "removing {field}"
            );
        }
    }

    #[test]
    fn reports_first_missing_field_only() {
        let body = payload(json!({ "address1": "1 Main", "zip": "10001" }));

        let err = NewAddress::from_payload(&body).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("firstName"));
        assert_eq!(err.to_string(), "Missing required field \"firstName\"");
    }

    #[test]
    fn falsy_values_count_as_missing() {
        for value in [json!(""), Value::Null, json!(false), json!(0)] {
            assert_eq!(
                NewAddress::from_payload(&with("city", value.clone())),
                Err(ValidationError::MissingField("city")),
                "city = {value}"
            );
        }
    }

    #[test]
    fn non_string_names_are_rejected() {
        assert_eq!(
            NewAddress::from_payload(&with("lastName", json!(42))),
            Err(ValidationError::NotAString("lastName"))
        );
        assert_eq!(
            NewAddress::from_payload(&with("address2", json!(["x"]))),
            Err(ValidationError::NotAString("address2"))
        );
    }

    #[test]
    fn state_must_be_two_characters() {
        for bad in [json!("N"), json!("NYC"), json!(12), json!(["N", "Y"])] {
            assert_eq!(
                NewAddress::from_payload(&with("state", bad.clone())),
                Err(ValidationError::InvalidState),
                "state = {bad}"
            );
        }

        for good in ["ny", "Zz", "1!", "éé"] {
            assert!(NewAddress::from_payload(&with("state", json!(good))).is_ok(), "state = {good}");
        }
    }

    #[test]
    fn zip_boundaries() {
        for good in ["10000", "99999", " 54321 "] {
            let address = NewAddress::from_payload(&with("zip", json!(good))).unwrap();
            assert_eq!(address.zip, good);
        }

        for bad in ["00000", "09999", "100000", "abc", "9999a", "12345.5", "NaN", "inf"] {
            assert_eq!(
                NewAddress::from_payload(&with("zip", json!(bad))),
                Err(ValidationError::InvalidZip),
                "zip = {bad}"
            );
        }
    }

    #[test]
    fn numeric_zip_is_coerced() {
        let address = NewAddress::from_payload(&with("zip", json!(20500))).unwrap();
        assert_eq!(address.zip, "20500");

        assert_eq!(
            NewAddress::from_payload(&with("zip", json!(9999))),
            Err(ValidationError::InvalidZip)
        );
        assert_eq!(
            NewAddress::from_payload(&with("zip", json!(true))),
            Err(ValidationError::InvalidZip)
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let address = NewAddress::from_payload(&with("country", json!("US"))).unwrap();
        assert_eq!(address.state, "NY");
    }
}
