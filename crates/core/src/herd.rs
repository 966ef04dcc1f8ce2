//! Herd snapshot - the roster handed to the engine.

use crate::animal::{Animal, AnimalStatus};
use crate::id::AnimalId;

/// An immutable, ordered view of the herd at one moment.
///
/// Roster order is preserved: derived alerts and events follow it.
#[derive(Debug, Clone, Default)]
pub struct HerdSnapshot {
    animals: Vec<Animal>,
}

impl HerdSnapshot {
    /// Wrap a roster.
    pub fn new(animals: Vec<Animal>) -> Self {
        Self { animals }
    }

    /// All animals, in roster order.
    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    /// Number of animals.
    pub fn len(&self) -> usize {
        self.animals.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Find an animal by ear tag.
    pub fn get(&self, id: &AnimalId) -> Option<&Animal> {
        self.animals.iter().find(|a| &a.id == id)
    }

    /// Animals with the given status.
    pub fn with_status(&self, status: AnimalStatus) -> impl Iterator<Item = &Animal> {
        self.animals.iter().filter(move |a| a.status == status)
    }

    /// Offspring registered with `mother` as their dam.
    pub fn offspring_of<'a>(&'a self, mother: &'a AnimalId) -> impl Iterator<Item = &'a Animal> {
        self.animals
            .iter()
            .filter(move |a| a.mother_id.as_ref() == Some(mother))
    }
}

impl From<Vec<Animal>> for HerdSnapshot {
    fn from(animals: Vec<Animal>) -> Self {
        Self::new(animals)
    }
}

impl<'a> IntoIterator for &'a HerdSnapshot {
    type Item = &'a Animal;
    type IntoIter = std::slice::Iter<'a, Animal>;

    fn into_iter(self) -> Self::IntoIter {
        self.animals.iter()
    }
}
