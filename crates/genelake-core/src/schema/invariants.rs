//! Row-local invariant checks, applied after coercion when enabled.
//!
//! Only invariants decidable from a single row are checked here. Uniqueness
//! of ids and allele membership span tables and are left to the store's readers.

use crate::errors::RowError;
use crate::types::{FieldValue, Row};

use super::tables::Entity;

/// Allowed gap between the recorded BMI and weight / height².
pub const BMI_TOLERANCE: f64 = 0.5;

static NULL_FIELD: FieldValue = FieldValue::Null;

fn field_of<'r>(entity: Entity, row: &'r Row, name: &str) -> &'r FieldValue {
    entity
        .schema()
        .index_of(name)
        .and_then(|i| row.get(i))
        .unwrap_or(&NULL_FIELD)
}

/// Check the invariants of `entity` against a coerced, schema-ordered row.
pub fn check_row_invariants(entity: Entity, row: &Row, row_index: usize) -> Result<(), RowError> {
    let field = |name: &str| field_of(entity, row, name);
    let violation = |rule: &'static str, detail: String| RowError::Invariant {
        row: row_index,
        rule,
        detail,
    };

    match entity {
        Entity::Individual => {
            if let (Some(birth), Some(collected)) =
                (field("birth_date").as_date(), field("collection_date").as_date())
            {
                if birth > collected {
                    return Err(violation(
                        "birth_date <= collection_date",
                        format!("{birth} is after {collected}"),
                    ));
                }
            }
        }
        Entity::Relationship => {
            if let (Some(parent), Some(child)) =
                (field("parent_id").as_text(), field("child_id").as_text())
            {
                if parent == child {
                    return Err(violation("parent_id != child_id", format!("both are {parent}")));
                }
            }
        }
        Entity::Marriage => {
            if let (Some(married), Some(divorced)) =
                (field("marriage_date").as_date(), field("divorce_date").as_date())
            {
                if divorced < married {
                    return Err(violation(
                        "divorce_date >= marriage_date",
                        format!("{divorced} is before {married}"),
                    ));
                }
            }
        }
        Entity::SnpDefinition => {
            if let Some(freq) = field("frequency").as_float() {
                if !(0.0..=1.0).contains(&freq) {
                    return Err(violation("frequency in [0, 1]", format!("got {freq}")));
                }
            }
        }
        Entity::IndelDefinition => {
            if let Some(length) = field("length").as_integer() {
                if length <= 0 {
                    return Err(violation("length > 0", format!("got {length}")));
                }
            }
        }
        Entity::StructuralVariant => {
            if let (Some(start), Some(end)) = (field("start").as_integer(), field("end").as_integer())
            {
                if end < start {
                    return Err(violation("end >= start", format!("{end} < {start}")));
                }
            }
        }
        Entity::HealthPhenotype => {
            if let (Some(height_cm), Some(weight_kg), Some(bmi)) = (
                field("height").as_float(),
                field("weight").as_float(),
                field("bmi").as_float(),
            ) {
                let height_m = height_cm / 100.0;
                if height_m <= 0.0 {
                    return Err(violation("height > 0", format!("got {height_cm}")));
                }
                let expected = weight_kg / (height_m * height_m);
                if (expected - bmi).abs() > BMI_TOLERANCE {
                    return Err(violation(
                        "bmi consistent with height/weight",
                        format!("recorded {bmi}, computed {expected:.2}"),
                    ));
                }
            }
        }
        Entity::Genotype | Entity::IndelGenotype | Entity::Lifestyle => {}
    }
    Ok(())
}
