use crate::core::RegistryError;

use super::lifecycle::Scene;

/// Append-only ordered collection of scenes with a current-scene pointer.
///
/// Indices are positions in registration order and stay valid for the life of
/// the registry, since scenes are never removed.
#[derive(Default)]
pub struct SceneRegistry {
    scenes: Vec<Box<dyn Scene>>,
    current: Option<usize>,
    capacity: Option<usize>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that refuses to hold more than `capacity` scenes.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Appends `scene` and returns its index.
    pub fn add(&mut self, scene: Box<dyn Scene>) -> Result<usize, RegistryError> {
        if let Some(capacity) = self.capacity {
            if self.scenes.len() >= capacity {
                return Err(RegistryError::CapacityExceeded { capacity });
            }
        }

        self.scenes.push(scene);
        Ok(self.scenes.len() - 1)
    }

    pub fn get(&self, index: usize) -> Result<&dyn Scene, RegistryError> {
        self.scenes
            .get(index)
            .map(|s| s.as_ref())
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                len: self.scenes.len(),
            })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut (dyn Scene + 'static), RegistryError> {
        let len = self.scenes.len();
        self.scenes
            .get_mut(index)
            .map(|s| s.as_mut())
            .ok_or(RegistryError::IndexOutOfRange { index, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    #[inline]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Selects the scene the loop drives. The index must be registered.
    pub fn set_current_index(&mut self, index: usize) -> Result<(), RegistryError> {
        if index >= self.scenes.len() {
            return Err(RegistryError::IndexOutOfRange {
                index,
                len: self.scenes.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }

    pub fn current(&self) -> Result<&dyn Scene, RegistryError> {
        let index = self.current.ok_or(RegistryError::NoCurrentScene)?;
        self.get(index)
    }

    pub fn current_mut(&mut self) -> Result<&mut (dyn Scene + 'static), RegistryError> {
        let index = self.current.ok_or(RegistryError::NoCurrentScene)?;
        self.get_mut(index)
    }
}
