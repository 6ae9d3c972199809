//! Field validation for item payloads.
//!
//! # Design
//! Validation runs on the raw JSON object rather than on a typed DTO, so a
//! wrongly-typed field (`"quantity": "1j"`) becomes a field error like any
//! other instead of an opaque decode failure. All offending fields are
//! reported together. Unknown keys, including `id`, are ignored.
//!
//! The same field rules back both entry points: `validate_for_create`
//! requires `name` and defaults `quantity`, `validate_for_update` checks only
//! the fields that are present.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::item::{ItemName, ItemPatch, NewItem, Quantity};

/// Key used when the body as a whole is unusable.
pub const BODY_FIELD: &str = "body";

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub message: String,
    /// The rejected value; absent when the field itself was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn new(message: impl Into<String>, value: &Value) -> Self {
        Self {
            message: message.into(),
            value: Some(value.clone()),
        }
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            value: None,
        }
    }
}

/// A payload that violates one or more field constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationError {
    pub errors: BTreeMap<String, FieldError>,
}

impl ValidationError {
    pub fn single(field: &str, error: FieldError) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), error);
        Self { errors }
    }

    /// Report a request body that could not be read as JSON.
    pub fn unreadable_body(reason: impl Into<String>) -> Self {
        Self::single(BODY_FIELD, FieldError::missing(reason))
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    fn collect<const N: usize>(results: [(&str, Option<FieldError>); N]) -> Self {
        let errors = results
            .into_iter()
            .filter_map(|(field, error)| error.map(|e| (field.to_string(), e)))
            .collect();
        Self { errors }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item validation failed")?;
        let mut sep = ": ";
        for (field, error) in &self.errors {
            write!(f, "{sep}{field}: {}", error.message)?;
            sep = ", ";
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Check a creation payload and normalize it.
///
/// `name` is required, `quantity` defaults to 1, and `done` is never read:
/// callers strip it first with [`strip_done`] and a new item is always
/// created not done.
pub fn validate_for_create(body: &Value) -> Result<NewItem, ValidationError> {
    let fields = as_object(body)?;

    let name = fields
        .get("name")
        .ok_or_else(|| FieldError::missing("name is required"))
        .and_then(parse_name);
    let quantity = fields
        .get("quantity")
        .map_or(Ok(Quantity::DEFAULT), parse_quantity);

    match (name, quantity) {
        (Ok(name), Ok(quantity)) => Ok(NewItem { name, quantity }),
        (name, quantity) => Err(ValidationError::collect([
            ("name", name.err()),
            ("quantity", quantity.err()),
        ])),
    }
}

/// Check a partial update. Only fields present in `body` are validated.
pub fn validate_for_update(body: &Value) -> Result<ItemPatch, ValidationError> {
    let fields = as_object(body)?;

    let name = fields.get("name").map(parse_name).transpose();
    let quantity = fields.get("quantity").map(parse_quantity).transpose();
    let done = fields.get("done").map(parse_done).transpose();

    match (name, quantity, done) {
        (Ok(name), Ok(quantity), Ok(done)) => Ok(ItemPatch {
            name,
            quantity,
            done,
        }),
        (name, quantity, done) => Err(ValidationError::collect([
            ("name", name.err()),
            ("quantity", quantity.err()),
            ("done", done.err()),
        ])),
    }
}

/// Drop any client-supplied `done` from a creation payload.
pub fn strip_done(mut body: Value) -> Value {
    if let Value::Object(fields) = &mut body {
        fields.remove("done");
    }
    body
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or_else(|| {
        ValidationError::single(
            BODY_FIELD,
            FieldError::new("request body must be a JSON object", body),
        )
    })
}

fn parse_name(value: &Value) -> Result<ItemName, FieldError> {
    match value {
        Value::String(raw) => {
            ItemName::new(raw).ok_or_else(|| FieldError::new("name must not be empty", value))
        }
        _ => Err(FieldError::new("name must be a string", value)),
    }
}

fn parse_quantity(value: &Value) -> Result<Quantity, FieldError> {
    let Value::Number(number) = value else {
        return Err(FieldError::new("quantity must be a number", value));
    };
    integral(number)
        .and_then(Quantity::new)
        .ok_or_else(|| FieldError::new("quantity must be an integer of at least 1", value))
}

/// The value of `number` if it is a whole, non-negative number that fits
/// in a `u64`. `5.0` counts; `0.1` and `-1` do not.
fn integral(number: &Number) -> Option<u64> {
    number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn parse_done(value: &Value) -> Result<bool, FieldError> {
    value
        .as_bool()
        .ok_or_else(|| FieldError::new("done must be a boolean", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // --- create ---

    #[test]
    fn create_defaults_quantity_to_one() {
        let item = validate_for_create(&json!({"name": "milk"})).unwrap();
        assert_eq!(item.name, "milk");
        assert_eq!(item.quantity.get(), 1);
    }

    #[test]
    fn create_trims_name() {
        let item = validate_for_create(&json!({"name": "  eggs  ", "quantity": 12})).unwrap();
        assert_eq!(item.name, "eggs");
        assert_eq!(item.quantity.get(), 12);
    }

    #[test]
    fn create_requires_name() {
        let err = validate_for_create(&json!({"quantity": 2})).unwrap_err();
        let field = err.field("name").unwrap();
        assert_eq!(field.message, "name is required");
        assert!(field.value.is_none());
    }

    #[test]
    fn create_rejects_blank_or_non_string_names() {
        for name in [json!(""), json!("   "), json!(null), json!(42), json!(["milk"])] {
            let err = validate_for_create(&json!({ "name": name })).unwrap_err();
            assert_eq!(err.field("name").unwrap().value, Some(name));
        }
    }

    #[test]
    fn create_rejects_invalid_quantities() {
        for quantity in [
            json!(0),
            json!(-1),
            json!(-13),
            json!(0.1),
            json!("1j"),
            json!("aksj"),
            json!("  "),
            json!(null),
            json!(true),
        ] {
            let err = validate_for_create(&json!({"name": "milk", "quantity": quantity}))
                .unwrap_err();
            assert!(err.field("quantity").is_some(), "{quantity} should be rejected");
            assert!(err.field("name").is_none());
        }
    }

    #[test]
    fn create_accepts_whole_floats() {
        let item = validate_for_create(&json!({"name": "milk", "quantity": 5.0})).unwrap();
        assert_eq!(item.quantity.get(), 5);
    }

    #[test]
    fn create_rejects_numeric_strings() {
        let err = validate_for_create(&json!({"name": "milk", "quantity": "5"})).unwrap_err();
        assert!(err.field("quantity").is_some());
    }

    #[test]
    fn create_reports_every_bad_field() {
        let err = validate_for_create(&json!({"name": " ", "quantity": 0})).unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert_eq!(
            err.to_string(),
            "item validation failed: name: name must not be empty, \
             quantity: quantity must be an integer of at least 1"
        );
    }

    #[test]
    fn create_ignores_unknown_fields() {
        let item =
            validate_for_create(&json!({"name": "milk", "id": "x", "colour": "white"})).unwrap();
        assert_eq!(item.name, "milk");
    }

    #[test]
    fn strip_done_removes_only_done() {
        let body = strip_done(json!({"name": "milk", "done": true}));
        assert_eq!(body, json!({"name": "milk"}));
        assert_eq!(strip_done(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        for body in [json!([]), json!("milk"), json!(null), json!(3)] {
            let err = validate_for_create(&body).unwrap_err();
            assert!(err.field(BODY_FIELD).is_some());
            let err = validate_for_update(&body).unwrap_err();
            assert!(err.field(BODY_FIELD).is_some());
        }
    }

    // --- update ---

    #[test]
    fn update_with_no_fields_is_empty_patch() {
        let patch = validate_for_update(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn update_accepts_each_field() {
        let patch =
            validate_for_update(&json!({"name": " bread ", "quantity": 3, "done": true})).unwrap();
        assert_eq!(patch.name.unwrap(), "bread");
        assert_eq!(patch.quantity.unwrap().get(), 3);
        assert_eq!(patch.done, Some(true));
    }

    #[test]
    fn update_rejects_blank_or_null_names() {
        for name in [json!(null), json!(""), json!("  ")] {
            let err = validate_for_update(&json!({ "name": name })).unwrap_err();
            assert!(err.field("name").is_some());
        }
    }

    #[test]
    fn update_rejects_invalid_quantities() {
        for quantity in [
            json!(0),
            json!(-1),
            json!(-13),
            json!(0.1),
            json!("1j"),
            json!("aksj"),
            json!("  "),
            json!(null),
        ] {
            let err = validate_for_update(&json!({ "quantity": quantity })).unwrap_err();
            assert!(err.field("quantity").is_some(), "{quantity} should be rejected");
        }
    }

    #[test]
    fn update_rejects_non_boolean_done() {
        for done in [json!(null), json!(""), json!(2), json!("true"), json!(0)] {
            let err = validate_for_update(&json!({ "done": done })).unwrap_err();
            assert!(err.field("done").is_some(), "{done} should be rejected");
        }
    }

    #[test]
    fn update_ignores_id() {
        let patch = validate_for_update(&json!({"id": "abc", "_id": "def"})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn validation_error_serializes_field_map() {
        let err = validate_for_update(&json!({"done": "yes"})).unwrap_err();
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"errors": {"done": {"message": "done must be a boolean", "value": "yes"}}})
        );
    }
}
