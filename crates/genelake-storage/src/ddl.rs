//! SQL text generated from table schemas.
//!
//! Tables are STRICT, carry NOT NULL on required columns and no keys or
//! foreign keys. Columns that link to another table get a lookup index.

use genelake_core::schema::{SemanticType, TableSchema};

/// The STRICT column type a semantic type is stored as.
/// Dates are ISO text; booleans are 0/1 integers.
pub fn sql_type(ty: SemanticType) -> &'static str {
    match ty {
        SemanticType::Integer | SemanticType::Boolean => "INTEGER",
        SemanticType::Float => "REAL",
        SemanticType::Text | SemanticType::Date | SemanticType::Enumerated(_) => "TEXT",
    }
}

/// Quote an identifier (`type`, `start` and `end` are column names here).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn create_table_sql(schema: &TableSchema) -> String {
    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|c| {
            let null = if c.nullable { "" } else { " NOT NULL" };
            format!("    {} {}{}", quote_ident(c.name), sql_type(c.ty), null)
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n) STRICT;",
        quote_ident(schema.name),
        columns.join(",\n")
    )
}

/// `CREATE INDEX` statements for every referencing column.
pub fn create_index_sql(schema: &TableSchema) -> Vec<String> {
    schema
        .columns
        .iter()
        .filter(|c| c.references.is_some())
        .map(|c| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({});",
                quote_ident(&format!("idx_{}_{}", schema.name, c.name)),
                quote_ident(schema.name),
                quote_ident(c.name)
            )
        })
        .collect()
}

pub fn insert_sql(schema: &TableSchema) -> String {
    let names: Vec<String> = schema.column_names().map(quote_ident).collect();
    let placeholders: Vec<String> = (1..=schema.columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(schema.name),
        names.join(", "),
        placeholders.join(", ")
    )
}

pub fn select_sql(schema: &TableSchema) -> String {
    let names: Vec<String> = schema.column_names().map(quote_ident).collect();
    format!(
        "SELECT {} FROM {} ORDER BY rowid LIMIT ?1",
        names.join(", "),
        quote_ident(schema.name)
    )
}
