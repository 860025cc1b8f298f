use serde::Deserialize;

use super::Field;

/// Body of create and full-update requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanetInput {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub population: Field<i64>,
    #[serde(default)]
    pub terrains: Field<String>,
    #[serde(default)]
    pub climates: Field<String>,
}

/// Body of partial-update requests.
///
/// The plain fields overwrite stored values. The `add_*` / `remove_*` lists
/// merge into the stored tag sets, with removal winning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanetPatch {
    #[serde(flatten)]
    pub fields: PlanetInput,
    #[serde(default)]
    pub add_terrains: Field<Vec<String>>,
    #[serde(default)]
    pub remove_terrains: Field<Vec<String>>,
    #[serde(default)]
    pub add_climates: Field<Vec<String>>,
    #[serde(default)]
    pub remove_climates: Field<Vec<String>>,
}

/// Query-string filters for listing planets. Every filter is optional and
/// they combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanetFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "name__icontains")]
    pub name_contains: Option<String>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default, rename = "population__gte")]
    pub population_gte: Option<i64>,
    #[serde(default, rename = "population__lte")]
    pub population_lte: Option<i64>,
    #[serde(default, rename = "terrains__icontains")]
    pub terrains_contains: Option<String>,
    #[serde(default, rename = "climates__icontains")]
    pub climates_contains: Option<String>,
}
