//! The ten table declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::{ColumnSpec, SemanticType};

const GENDERS: &[&str] = &["Male", "Female", "Other"];
const INDEL_TYPES: &[&str] = &["insertion", "deletion"];
const INDEL_STATES: &[&str] = &["0/0", "0/1", "1/1"];
const SV_TYPES: &[&str] = &["deletion", "duplication", "inversion", "translocation"];
const BLOOD_TYPES: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
const SMOKING: &[&str] = &["never", "former", "current"];
const ALCOHOL: &[&str] = &["none", "light", "moderate", "heavy"];
const EXERCISE: &[&str] = &["none", "light", "moderate", "intense"];

use SemanticType::{Boolean, Date, Enumerated, Float, Integer, Text};

const INDIVIDUALS: &[ColumnSpec] = &[
    ColumnSpec::required("id", Text),
    ColumnSpec::required("name", Text),
    ColumnSpec::required("gender", Enumerated(GENDERS)),
    ColumnSpec::required("birth_date", Date),
    ColumnSpec::required("location", Text),
    ColumnSpec::required("collection_date", Date),
    ColumnSpec::required("coverage", Float),
    ColumnSpec::required("consent", Boolean),
];

const RELATIONSHIPS: &[ColumnSpec] = &[
    ColumnSpec::required("parent_id", Text).references("individuals", "id"),
    ColumnSpec::required("child_id", Text).references("individuals", "id"),
];

const MARRIAGES: &[ColumnSpec] = &[
    ColumnSpec::required("partner1_id", Text).references("individuals", "id"),
    ColumnSpec::required("partner2_id", Text).references("individuals", "id"),
    ColumnSpec::required("marriage_date", Date),
    ColumnSpec::optional("divorce_date", Date),
];

const SNP_DEFINITIONS: &[ColumnSpec] = &[
    ColumnSpec::required("snp_id", Text),
    ColumnSpec::required("chromosome", Text),
    ColumnSpec::required("position", Integer),
    ColumnSpec::required("alleles", Text),
    ColumnSpec::required("frequency", Float),
];

const GENOTYPES: &[ColumnSpec] = &[
    ColumnSpec::required("individual_id", Text).references("individuals", "id"),
    ColumnSpec::required("snp_id", Text).references("snp_definitions", "snp_id"),
    ColumnSpec::required("allele_pair", Text),
];

const INDEL_DEFINITIONS: &[ColumnSpec] = &[
    ColumnSpec::required("indel_id", Text),
    ColumnSpec::required("chromosome", Text),
    ColumnSpec::required("position", Integer),
    ColumnSpec::required("type", Enumerated(INDEL_TYPES)),
    ColumnSpec::required("length", Integer),
];

const INDEL_GENOTYPES: &[ColumnSpec] = &[
    ColumnSpec::required("individual_id", Text).references("individuals", "id"),
    ColumnSpec::required("indel_id", Text).references("indel_definitions", "indel_id"),
    ColumnSpec::required("state", Enumerated(INDEL_STATES)),
];

const STRUCTURAL_VARIANTS: &[ColumnSpec] = &[
    ColumnSpec::required("variant_id", Text),
    ColumnSpec::required("individual_id", Text).references("individuals", "id"),
    ColumnSpec::required("type", Enumerated(SV_TYPES)),
    ColumnSpec::required("chromosome", Text),
    ColumnSpec::required("start", Integer),
    ColumnSpec::required("end", Integer),
];

const HEALTH_PHENOTYPES: &[ColumnSpec] = &[
    ColumnSpec::required("individual_id", Text).references("individuals", "id"),
    ColumnSpec::required("height", Float),
    ColumnSpec::required("weight", Float),
    ColumnSpec::required("bmi", Float),
    ColumnSpec::required("blood_type", Enumerated(BLOOD_TYPES)),
    ColumnSpec::optional("disease_flags", Text),
];

const LIFESTYLE: &[ColumnSpec] = &[
    ColumnSpec::required("individual_id", Text).references("individuals", "id"),
    ColumnSpec::required("smoking", Enumerated(SMOKING)),
    ColumnSpec::required("alcohol", Enumerated(ALCOHOL)),
    ColumnSpec::required("exercise", Enumerated(EXERCISE)),
    ColumnSpec::optional("occupation", Text),
];

/// The ordered column layout of one destination table.
#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub entity: Entity,
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Position of a column in the declared order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The semantic type a raw field in `column` must coerce to.
    pub fn expected_type(&self, column: &str) -> Option<SemanticType> {
        self.column(column).map(|c| c.ty)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Tables this one links to, deduplicated, in column order.
    pub fn referenced_tables(&self) -> Vec<&'static str> {
        let mut tables: Vec<&'static str> = Vec::new();
        for reference in self.columns.iter().filter_map(|c| c.references) {
            if !tables.contains(&reference.table) {
                tables.push(reference.table);
            }
        }
        tables
    }
}

static INDIVIDUALS_SCHEMA: TableSchema = TableSchema {
    entity: Entity::Individual,
    name: "individuals",
    columns: INDIVIDUALS,
};
static RELATIONSHIPS_SCHEMA: TableSchema = TableSchema {
    entity: Entity::Relationship,
    name: "relationships",
    columns: RELATIONSHIPS,
};
static MARRIAGES_SCHEMA: TableSchema = TableSchema {
    entity: Entity::Marriage,
    name: "marriages",
    columns: MARRIAGES,
};
static SNP_DEFINITIONS_SCHEMA: TableSchema = TableSchema {
    entity: Entity::SnpDefinition,
    name: "snp_definitions",
    columns: SNP_DEFINITIONS,
};
static GENOTYPES_SCHEMA: TableSchema = TableSchema {
    entity: Entity::Genotype,
    name: "genotypes",
    columns: GENOTYPES,
};
static INDEL_DEFINITIONS_SCHEMA: TableSchema = TableSchema {
    entity: Entity::IndelDefinition,
    name: "indel_definitions",
    columns: INDEL_DEFINITIONS,
};
static INDEL_GENOTYPES_SCHEMA: TableSchema = TableSchema {
    entity: Entity::IndelGenotype,
    name: "indel_genotypes",
    columns: INDEL_GENOTYPES,
};
static STRUCTURAL_VARIANTS_SCHEMA: TableSchema = TableSchema {
    entity: Entity::StructuralVariant,
    name: "structural_variants",
    columns: STRUCTURAL_VARIANTS,
};
static HEALTH_PHENOTYPES_SCHEMA: TableSchema = TableSchema {
    entity: Entity::HealthPhenotype,
    name: "health_phenotypes",
    columns: HEALTH_PHENOTYPES,
};
static LIFESTYLE_SCHEMA: TableSchema = TableSchema {
    entity: Entity::Lifestyle,
    name: "lifestyle",
    columns: LIFESTYLE,
};

/// The ten record types of the data lake, one per input file and table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Individual,
    Relationship,
    Marriage,
    SnpDefinition,
    Genotype,
    IndelDefinition,
    IndelGenotype,
    StructuralVariant,
    HealthPhenotype,
    Lifestyle,
}

impl Entity {
    pub const ALL: [Entity; 10] = [
        Entity::Individual,
        Entity::Relationship,
        Entity::Marriage,
        Entity::SnpDefinition,
        Entity::Genotype,
        Entity::IndelDefinition,
        Entity::IndelGenotype,
        Entity::StructuralVariant,
        Entity::HealthPhenotype,
        Entity::Lifestyle,
    ];

    pub fn schema(self) -> &'static TableSchema {
        match self {
            Self::Individual => &INDIVIDUALS_SCHEMA,
            Self::Relationship => &RELATIONSHIPS_SCHEMA,
            Self::Marriage => &MARRIAGES_SCHEMA,
            Self::SnpDefinition => &SNP_DEFINITIONS_SCHEMA,
            Self::Genotype => &GENOTYPES_SCHEMA,
            Self::IndelDefinition => &INDEL_DEFINITIONS_SCHEMA,
            Self::IndelGenotype => &INDEL_GENOTYPES_SCHEMA,
            Self::StructuralVariant => &STRUCTURAL_VARIANTS_SCHEMA,
            Self::HealthPhenotype => &HEALTH_PHENOTYPES_SCHEMA,
            Self::Lifestyle => &LIFESTYLE_SCHEMA,
        }
    }

    pub fn table_name(self) -> &'static str {
        self.schema().name
    }

    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.table_name() == name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Look up a table's column schema by table name.
pub fn schema_for(table: &str) -> Option<&'static TableSchema> {
    Entity::from_table_name(table).map(Entity::schema)
}
