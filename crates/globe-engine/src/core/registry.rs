use crate::api::types::AttackId;
use crate::systems::attack::AttackVisual;

/// The active set of attack visuals, in a flat Vec.
/// Sized for tens to low hundreds of concurrent arcs.
pub struct VisualRegistry {
    visuals: Vec<AttackVisual>,
}

impl VisualRegistry {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            visuals: Vec::with_capacity(capacity),
        }
    }

    /// Register a visual. Refused (and handed back) if its id is already active.
    pub fn insert(&mut self, visual: AttackVisual) -> Result<(), AttackVisual> {
        if self.contains(visual.id()) {
            return Err(visual);
        }
        self.visuals.push(visual);
        Ok(())
    }

    /// Remove a visual by id. Returns it if it was active.
    pub fn remove(&mut self, id: AttackId) -> Option<AttackVisual> {
        let idx = self.visuals.iter().position(|v| v.id() == id)?;
        Some(self.visuals.swap_remove(idx))
    }

    pub fn contains(&self, id: AttackId) -> bool {
        self.visuals.iter().any(|v| v.id() == id)
    }

    pub fn get(&self, id: AttackId) -> Option<&AttackVisual> {
        self.visuals.iter().find(|v| v.id() == id)
    }

    pub fn get_mut(&mut self, id: AttackId) -> Option<&mut AttackVisual> {
        self.visuals.iter_mut().find(|v| v.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackVisual> {
        self.visuals.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AttackVisual> {
        self.visuals.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn clear(&mut self) {
        self.visuals.clear();
    }
}

impl Default for VisualRegistry {
    fn default() -> Self {
        Self::new()
    }
}
