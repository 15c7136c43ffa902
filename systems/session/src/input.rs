use std::collections::BTreeSet;

/// Read-only view of the keys the player is holding.
pub trait InputState {
    /// Reports whether the key with the provided code, such as `KeyW`, is held.
    fn is_pressed(&self, key: &str) -> bool;
}

/// Input source with nothing held.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputState for NoInput {
    fn is_pressed(&self, _key: &str) -> bool {
        false
    }
}

/// Set of currently held key codes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<String>,
}

impl HeldKeys {
    /// Creates an empty key set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held.
    pub fn press(&mut self, key: impl Into<String>) {
        let _ = self.keys.insert(key.into());
    }

    /// Marks `key` as released.
    pub fn release(&mut self, key: &str) {
        let _ = self.keys.remove(key);
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl InputState for HeldKeys {
    fn is_pressed(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}
