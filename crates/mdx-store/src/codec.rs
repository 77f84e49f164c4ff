//! JSON form of field maps
//!
//! Metadata records are persisted as a JSON object keyed by core field name.
//! Absent fields are written as `null` so the stored object always carries the
//! full key set.

use mdx_domain::metadata::FieldKind;
use mdx_domain::{CoreField, FieldMap, FieldValue};
use serde_json::{Map, Value};

/// Encode a field map as a JSON object
pub fn fields_to_json(fields: &FieldMap) -> Value {
    let object: Map<String, Value> = fields
        .iter()
        .map(|(field, value)| (field.name().to_string(), value_to_json(value)))
        .collect();
    Value::Object(object)
}

/// Decode a field map from its JSON object form
///
/// Unknown keys are ignored and missing keys decode as absent. String values
/// on date/time fields decode as timestamps.
pub fn fields_from_json(value: &Value) -> Result<FieldMap, String> {
    let object = value
        .as_object()
        .ok_or_else(|| "metadata record is not a JSON object".to_string())?;

    let mut fields = FieldMap::absent();
    for field in CoreField::ALL {
        let decoded = match object.get(field.name()) {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(Value::String(s)) => match field.kind() {
                FieldKind::DateTime => FieldValue::Timestamp(s.clone()),
                _ => FieldValue::Text(s.clone()),
            },
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Text(n.to_string()),
            },
            Some(other) => {
                return Err(format!("unexpected value for {}: {}", field, other));
            }
        };
        fields.set(field, decoded);
    }
    Ok(fields)
}

fn value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) | FieldValue::Timestamp(s) => Value::String(s.clone()),
        FieldValue::Integer(i) => Value::from(*i),
        FieldValue::Absent => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_encode_as_null() {
        let value = fields_to_json(&FieldMap::absent());
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 15);
        assert!(object.values().all(Value::is_null));
    }

    #[test]
    fn test_decode_restores_kinds() {
        let mut fields = FieldMap::absent();
        fields.set(CoreField::Author, FieldValue::Text("A".into()));
        fields.set(CoreField::Created, FieldValue::Timestamp("2024-01-15T10:30:00+00:00".into()));
        fields.set(CoreField::Revision, FieldValue::Integer(4));

        let decoded = fields_from_json(&fields_to_json(&fields)).unwrap();
        assert_eq!(decoded, fields);
    }

    #[test]
    fn test_decode_tolerates_missing_and_unknown_keys() {
        let decoded = fields_from_json(&json!({"title": "T", "body": "ignored"})).unwrap();

        assert_eq!(decoded.get(CoreField::Title), &FieldValue::Text("T".into()));
        assert!(decoded.get(CoreField::Author).is_absent());
        assert_eq!(decoded.len(), 15);
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        assert!(fields_from_json(&json!(["title"])).is_err());
        assert!(fields_from_json(&json!({"title": {"nested": true}})).is_err());
    }
}
