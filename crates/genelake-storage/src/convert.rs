//! Conversion between `FieldValue` and SQLite values.

use chrono::NaiveDate;
use genelake_core::schema::SemanticType;
use genelake_core::types::FieldValue;
use rusqlite::types::{Value, ValueRef};

/// The SQLite value a field is bound as.
pub fn to_sql_value(field: &FieldValue) -> Value {
    match field {
        FieldValue::Null => Value::Null,
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Integer(v) => Value::Integer(*v),
        FieldValue::Float(v) => Value::Real(*v),
        FieldValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
        FieldValue::Boolean(b) => Value::Integer(i64::from(*b)),
    }
}

/// Decode a stored value back into a field of the declared type.
/// Values that do not match the declared type are returned in their raw form.
pub fn from_sql_value(value: ValueRef<'_>, ty: SemanticType) -> FieldValue {
    match (value, ty) {
        (ValueRef::Null, _) => FieldValue::Null,
        (ValueRef::Integer(v), SemanticType::Boolean) => FieldValue::Boolean(v != 0),
        (ValueRef::Integer(v), _) => FieldValue::Integer(v),
        (ValueRef::Real(v), _) => FieldValue::Float(v),
        (ValueRef::Text(bytes), SemanticType::Date) => {
            let text = String::from_utf8_lossy(bytes);
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map(FieldValue::Date)
                .unwrap_or_else(|_| FieldValue::Text(text.into_owned()))
        }
        (ValueRef::Text(bytes), _) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        (ValueRef::Blob(bytes), _) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}
