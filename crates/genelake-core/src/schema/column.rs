//! Column declarations and field coercion.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::RowTypeError;
use crate::types::FieldValue;

/// Raw tokens read as a missing value (pandas' default NA set, trimmed down).
pub const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// The semantic type a raw text field is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Text,
    Integer,
    Float,
    /// ISO `YYYY-MM-DD`.
    Date,
    Boolean,
    /// One of a fixed set of spellings, matched case-insensitively.
    Enumerated(&'static [&'static str]),
}

impl SemanticType {
    /// Coerce an already-trimmed, non-null raw field.
    pub fn coerce(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Text => Some(FieldValue::Text(raw.to_string())),
            Self::Integer => raw.parse::<i64>().ok().map(FieldValue::Integer),
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Float),
            Self::Date => parse_date(raw).map(FieldValue::Date),
            Self::Boolean => parse_bool(raw).map(FieldValue::Boolean),
            Self::Enumerated(values) => values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(raw))
                .map(|v| FieldValue::Text((*v).to_string())),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Date => f.write_str("date (YYYY-MM-DD)"),
            Self::Boolean => f.write_str("boolean"),
            Self::Enumerated(values) => write!(f, "one of [{}]", values.join(", ")),
        }
    }
}

/// A referential link from a column to another table's key column.
/// Advisory only: the store declares no foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub table: &'static str,
    pub column: &'static str,
}

/// One declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: SemanticType,
    pub nullable: bool,
    pub references: Option<Reference>,
}

impl ColumnSpec {
    pub const fn required(name: &'static str, ty: SemanticType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            references: None,
        }
    }

    pub const fn optional(name: &'static str, ty: SemanticType) -> Self {
        Self {
            name,
            ty,
            nullable: true,
            references: None,
        }
    }

    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(Reference { table, column });
        self
    }

    /// Coerce a raw field for this column. `row` is only used for error reporting.
    pub fn coerce(&self, raw: &str, row: usize) -> Result<FieldValue, RowTypeError> {
        let trimmed = raw.trim();
        if NULL_TOKENS.contains(&trimmed) {
            if self.nullable {
                return Ok(FieldValue::Null);
            }
            return Err(self.type_error(raw, row));
        }
        self.ty
            .coerce(trimmed)
            .ok_or_else(|| self.type_error(raw, row))
    }

    fn type_error(&self, raw: &str, row: usize) -> RowTypeError {
        let expected = if self.nullable {
            self.ty.to_string()
        } else {
            format!("non-null {}", self.ty)
        };
        RowTypeError {
            row,
            column: self.name.to_string(),
            value: raw.to_string(),
            expected,
        }
    }
}

/// Timestamp layouts whose time component is dropped.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    // Datetime-typed exports write `YYYY-MM-DD 00:00:00`; anything after the
    // date must still be a valid time.
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
