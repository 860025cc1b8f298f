//! Planet operations shared by the HTTP handlers and the CLI.

use chrono::Utc;

use super::tags::merge_tags;
use super::validation::{
    FieldErrors, PlanetChanges, check_tags_len, validate_changes, validate_new_planet,
    validate_tag_list,
};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Planet, PlanetFilter, PlanetInput, PlanetPatch};

pub fn list(store: &dyn Store, filter: &PlanetFilter) -> Result<Vec<Planet>> {
    store.list_planets(filter)
}

/// Exact, case-sensitive lookup.
pub fn retrieve(store: &dyn Store, name: &str) -> Result<Planet> {
    store.get_planet_by_name(name)?.ok_or(Error::NotFound)
}

pub fn create(store: &dyn Store, input: &PlanetInput) -> Result<Planet> {
    let mut planet = validate_new_planet(input).map_err(Error::Validation)?;

    if store.find_planet_by_name_ci(&planet.name)?.is_some() {
        return Err(Error::Duplicate(planet.name));
    }

    planet.id = store.create_planet(&planet).map_err(|e| duplicate(e, &planet.name))?;
    Ok(planet)
}

/// Replaces the supplied fields of the planet called `name`.
pub fn update(store: &dyn Store, name: &str, input: &PlanetInput) -> Result<Planet> {
    let mut planet = retrieve(store, name)?;
    let changes = validate_changes(input).map_err(Error::Validation)?;

    changes.apply_to(&mut planet);
    save(store, planet)
}

/// Overwrites the supplied plain fields, then merges the `add_*` / `remove_*`
/// lists into the stored tag sets. A tag field is only rewritten when at least
/// one of its lists was supplied.
pub fn patch(store: &dyn Store, name: &str, patch: &PlanetPatch) -> Result<Planet> {
    let mut planet = retrieve(store, name)?;

    let (changes, mut errors) = match validate_changes(&patch.fields) {
        Ok(changes) => (changes, FieldErrors::new()),
        Err(errors) => (PlanetChanges::default(), errors),
    };
    let add_terrains = validate_tag_list("add_terrains", &patch.add_terrains, &mut errors);
    let remove_terrains =
        validate_tag_list("remove_terrains", &patch.remove_terrains, &mut errors);
    let add_climates = validate_tag_list("add_climates", &patch.add_climates, &mut errors);
    let remove_climates =
        validate_tag_list("remove_climates", &patch.remove_climates, &mut errors);
    errors
        .into_result(changes)
        .map_err(Error::Validation)?
        .apply_to(&mut planet);

    let mut errors = FieldErrors::new();
    if let Some(terrains) = merge_field(&planet.terrains, add_terrains, remove_terrains) {
        check_tags_len("terrains", &terrains, &mut errors);
        planet.terrains = terrains;
    }
    if let Some(climates) = merge_field(&planet.climates, add_climates, remove_climates) {
        check_tags_len("climates", &climates, &mut errors);
        planet.climates = climates;
    }
    let planet = errors.into_result(planet).map_err(Error::Validation)?;

    save(store, planet)
}

pub fn delete(store: &dyn Store, name: &str) -> Result<()> {
    let planet = retrieve(store, name)?;
    if !store.delete_planet(planet.id)? {
        return Err(Error::NotFound);
    }
    tracing::info!("Deleted planet '{}'", planet.name);
    Ok(())
}

fn merge_field(current: &str, add: Option<&[String]>, remove: Option<&[String]>) -> Option<String> {
    if add.is_none() && remove.is_none() {
        return None;
    }
    Some(merge_tags(
        current,
        add.unwrap_or_default(),
        remove.unwrap_or_default(),
    ))
}

fn save(store: &dyn Store, mut planet: Planet) -> Result<Planet> {
    if let Some(existing) = store.find_planet_by_name_ci(&planet.name)? {
        if existing.id != planet.id {
            return Err(Error::Duplicate(planet.name));
        }
    }

    planet.updated_at = Utc::now();
    store
        .update_planet(&planet)
        .map_err(|e| duplicate(e, &planet.name))?;
    Ok(planet)
}

fn duplicate(err: Error, name: &str) -> Error {
    match err {
        Error::AlreadyExists => Error::Duplicate(name.to_string()),
        other => other,
    }
}
