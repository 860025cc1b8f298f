use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::tags::join_ingested;
use super::validation::validate_new_planet;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Field, Planet, PlanetInput, from_object};

/// A planet as delivered by the upstream source, before normalisation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePlanet {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub population: Option<Value>,
    #[serde(default)]
    pub terrains: Option<Value>,
    #[serde(default)]
    pub climates: Option<Value>,
}

impl CandidatePlanet {
    fn display_name(&self) -> String {
        match &self.name {
            Field::Present(name) => name.clone(),
            _ => "<unnamed>".to_string(),
        }
    }

    /// Converts the upstream shape into a creation request: null population
    /// becomes 0 and tag lists are hyphen-joined.
    fn into_input(self) -> PlanetInput {
        PlanetInput {
            name: self.name,
            population: normalize_population(self.population.as_ref()),
            terrains: Field::Present(join_ingested(self.terrains.as_ref())),
            climates: Field::Present(join_ingested(self.climates.as_ref())),
        }
    }
}

/// Upstream populations arrive as JSON numbers, sometimes as floats with a
/// zero fraction. Anything that is not a whole number is invalid.
fn normalize_population(value: Option<&Value>) -> Field<i64> {
    match value {
        None | Some(Value::Null) => Field::Present(0),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Field::Present(i)
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Field::Present(f as i64)
                } else {
                    Field::Invalid
                }
            } else {
                Field::Invalid
            }
        }
        Some(_) => Field::Invalid,
    }
}

#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub saved_planets: Vec<Planet>,
    pub skipped_planets: Vec<String>,
}

/// Inserts every candidate whose name is not already stored.
///
/// Existing planets (compared case-insensitively) are never modified and are
/// reported as skipped. A candidate that fails validation is logged and left
/// out without aborting the batch, as is a record that is not a JSON object.
/// Only storage failures abort.
pub fn reconcile(store: &dyn Store, records: Vec<Value>) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    for record in records {
        let candidate: CandidatePlanet = match from_object(record) {
            Ok(candidate) => candidate,
            Err(reason) => {
                warn!(%reason, "Rejected malformed ingested planet");
                continue;
            }
        };
        let display_name = candidate.display_name();

        if let Field::Present(name) = &candidate.name {
            if store.find_planet_by_name_ci(name.trim())?.is_some() {
                report.skipped_planets.push(display_name);
                continue;
            }
        }

        let mut planet = match validate_new_planet(&candidate.into_input()) {
            Ok(planet) => planet,
            Err(errors) => {
                warn!(planet = %display_name, %errors, "Rejected ingested planet");
                continue;
            }
        };

        match store.create_planet(&planet) {
            Ok(id) => {
                planet.id = id;
                report.saved_planets.push(planet);
            }
            // Inserted concurrently since the lookup above.
            Err(Error::AlreadyExists) => report.skipped_planets.push(display_name),
            Err(e) => return Err(e),
        }
    }

    info!(
        saved = report.saved_planets.len(),
        skipped = report.skipped_planets.len(),
        "Planet ingestion finished"
    );

    Ok(report)
}
