//! Species registry.

use espic_species::Species;
use indexmap::IndexMap;

use crate::config::ConfigError;

/// The set of species in a simulation, keyed by name.
///
/// Iteration follows insertion order, which is also the deposit order.
#[derive(Clone, Debug, Default)]
pub struct Plasma {
    species: IndexMap<String, Species>,
}

impl Plasma {
    /// An empty plasma.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a species.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateSpecies`] if a species with the same
    /// name is already registered.
    pub fn insert(&mut self, species: Species) -> Result<(), ConfigError> {
        if self.species.contains_key(species.name()) {
            return Err(ConfigError::DuplicateSpecies {
                name: species.name().to_string(),
            });
        }
        self.species.insert(species.name().to_string(), species);
        Ok(())
    }

    /// Look up a species by name.
    pub fn get(&self, name: &str) -> Option<&Species> {
        self.species.get(name)
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether no species are registered.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Species in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.values()
    }

    /// Species in insertion order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Species> {
        self.species.values_mut()
    }

    /// Total number of tracked particles across kinetic species.
    pub fn particle_count(&self) -> usize {
        self.iter().map(Species::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adiabatic(name: &str) -> Species {
        Species::builder(name).adiabatic().build().unwrap()
    }

    #[test]
    fn keeps_insertion_order() {
        let mut plasma = Plasma::new();
        for name in ["c", "a", "b"] {
            plasma.insert(adiabatic(name)).unwrap();
        }
        let names: Vec<_> = plasma.iter().map(Species::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut plasma = Plasma::new();
        plasma.insert(adiabatic("ions")).unwrap();
        assert_eq!(
            plasma.insert(adiabatic("ions")),
            Err(ConfigError::DuplicateSpecies {
                name: "ions".into()
            })
        );
        assert_eq!(plasma.len(), 1);
    }

    #[test]
    fn counts_only_kinetic_particles() {
        let mut plasma = Plasma::new();
        plasma.insert(adiabatic("ions")).unwrap();
        plasma
            .insert(Species::builder("electrons").particles(7).build().unwrap())
            .unwrap();
        assert_eq!(plasma.particle_count(), 7);
        assert!(plasma.get("electrons").is_some_and(Species::is_kinetic));
    }
}
