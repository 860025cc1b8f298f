use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::{Field, Planet, PlanetInput};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TAGS_LEN: usize = 255;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Field values that passed validation. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanetChanges {
    pub name: Option<String>,
    pub population: Option<Option<i64>>,
    pub terrains: Option<String>,
    pub climates: Option<String>,
}

impl PlanetChanges {
    /// Overwrites the supplied fields of `planet`.
    pub fn apply_to(self, planet: &mut Planet) {
        if let Some(name) = self.name {
            planet.name = name;
        }
        if let Some(population) = self.population {
            planet.population = population;
        }
        if let Some(terrains) = self.terrains {
            planet.terrains = terrains;
        }
        if let Some(climates) = self.climates {
            planet.climates = climates;
        }
    }
}

fn validate_name(field: &Field<String>, errors: &mut FieldErrors) -> Option<String> {
    match field {
        Field::Absent => None,
        Field::Null => {
            errors.add("name", "This field may not be null.");
            None
        }
        Field::Invalid => {
            errors.add("name", "Not a valid string.");
            None
        }
        Field::Present(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                errors.add("name", "Planet name cannot be empty.");
                None
            } else if trimmed.chars().count() > MAX_NAME_LEN {
                errors.add(
                    "name",
                    format!("Ensure this field has no more than {MAX_NAME_LEN} characters."),
                );
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

fn validate_population(field: &Field<i64>, errors: &mut FieldErrors) -> Option<Option<i64>> {
    match field {
        Field::Absent => None,
        Field::Null => Some(None),
        Field::Invalid => {
            errors.add("population", "A valid integer is required.");
            None
        }
        Field::Present(value) if *value < 0 => {
            errors.add("population", "Population cannot be negative.");
            None
        }
        Field::Present(value) => Some(Some(*value)),
    }
}

/// Checks the stored length limit of a tag field.
pub fn check_tags_len(field: &str, value: &str, errors: &mut FieldErrors) -> bool {
    if value.chars().count() > MAX_TAGS_LEN {
        errors.add(
            field,
            format!("Ensure this field has no more than {MAX_TAGS_LEN} characters."),
        );
        return false;
    }
    true
}

fn validate_tags(
    field: &str,
    label: &str,
    value: &Field<String>,
    errors: &mut FieldErrors,
) -> Option<String> {
    match value {
        Field::Absent => None,
        Field::Null => {
            errors.add(field, format!("{label} field cannot be null."));
            None
        }
        Field::Invalid => {
            errors.add(field, format!("{label} must be a comma-separated string."));
            None
        }
        Field::Present(value) => check_tags_len(field, value, errors).then(|| value.clone()),
    }
}

/// Validates an `add_*` / `remove_*` list of a partial update.
pub fn validate_tag_list<'a>(
    field: &str,
    value: &'a Field<Vec<String>>,
    errors: &mut FieldErrors,
) -> Option<&'a [String]> {
    match value {
        Field::Absent => None,
        Field::Null => {
            errors.add(field, "This field may not be null.");
            None
        }
        Field::Invalid => {
            errors.add(field, "Expected a list of strings.");
            None
        }
        Field::Present(items) => Some(items),
    }
}

/// Validates every supplied field, collecting all failures.
pub fn validate_changes(input: &PlanetInput) -> Result<PlanetChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let changes = PlanetChanges {
        name: validate_name(&input.name, &mut errors),
        population: validate_population(&input.population, &mut errors),
        terrains: validate_tags("terrains", "Terrains", &input.terrains, &mut errors),
        climates: validate_tags("climates", "Climates", &input.climates, &mut errors),
    };
    errors.into_result(changes)
}

/// Validates a creation request. `name` is required; absent tag fields
/// default to an empty string and absent population to null.
pub fn validate_new_planet(input: &PlanetInput) -> Result<Planet, FieldErrors> {
    let (changes, mut errors) = match validate_changes(input) {
        Ok(changes) => (changes, FieldErrors::new()),
        Err(errors) => (PlanetChanges::default(), errors),
    };

    if input.name.is_absent() {
        errors.add("name", "This field is required.");
    }

    let changes = errors.into_result(changes)?;
    Ok(Planet::new(
        changes.name.unwrap_or_default(),
        changes.population.flatten(),
        changes.terrains.unwrap_or_default(),
        changes.climates.unwrap_or_default(),
    ))
}
