//! Per-navigator stack of scenes
//!
//! The stack records which scenes a navigator has shown, bottom (root) to
//! top. Entries are weak: the host owns scenes, so an entry whose scene was
//! destroyed behind the router's back reads as an empty slot until the next
//! [`NavigationStack::compact`].

use std::rc::Rc;

use crate::scene::{SceneId, SceneRef, WeakScene};

/// One stack entry
#[derive(Debug, Clone)]
pub struct StackSlot {
    scene: WeakScene,
    id: SceneId,
    identifier: String,
}

impl StackSlot {
    /// Create a slot for a scene
    pub fn new(scene: &SceneRef) -> Self {
        Self {
            scene: Rc::downgrade(scene),
            id: scene.id(),
            identifier: scene.identifier().to_string(),
        }
    }

    /// The scene, if it is still alive
    pub fn scene(&self) -> Option<SceneRef> {
        self.scene.upgrade()
    }

    /// Whether the scene is still alive
    pub fn is_live(&self) -> bool {
        self.scene.strong_count() > 0
    }

    /// Id of the scene the slot was created for
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Identifier of the scene the slot was created for
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Ordered, weakly-held record of shown scenes
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    /// Slots (bottom to top)
    slots: Vec<StackSlot>,
}

impl NavigationStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a scene on top
    pub fn push(&mut self, scene: &SceneRef) {
        self.slots.push(StackSlot::new(scene));
    }

    /// Remove `[from, len)` and return the scene that was at `from`
    ///
    /// Returns none (and removes nothing) when `from` is out of range. A dead
    /// slot at `from` is still trimmed but yields none.
    pub fn pop(&mut self, from: usize) -> Option<SceneRef> {
        if from >= self.slots.len() {
            return None;
        }
        let popped = self.slots[from].scene();
        self.slots.truncate(from);
        popped
    }

    /// Pop everything above the root
    pub fn pop_to_root(&mut self) -> Option<SceneRef> {
        self.pop(1)
    }

    /// Pop everything, root included
    pub fn pop_all(&mut self) -> Option<SceneRef> {
        self.pop(0)
    }

    /// Index of the first live scene with the given identifier
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.identifier == identifier && slot.is_live())
    }

    /// Index of a specific scene
    pub fn position(&self, scene: &SceneRef) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == scene.id())
    }

    /// Whether the scene is on this stack
    pub fn contains(&self, scene: &SceneRef) -> bool {
        self.position(scene).is_some()
    }

    /// Remove one scene, keeping everything above it
    pub fn remove(&mut self, scene: &SceneRef) -> bool {
        match self.position(scene) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Scene at `index`, none for holes and out-of-range indices
    pub fn get(&self, index: usize) -> Option<SceneRef> {
        self.slots.get(index).and_then(StackSlot::scene)
    }

    /// Top scene
    pub fn top(&self) -> Option<SceneRef> {
        self.slots.last().and_then(StackSlot::scene)
    }

    /// Root scene
    pub fn root(&self) -> Option<SceneRef> {
        self.slots.first().and_then(StackSlot::scene)
    }

    /// Number of slots, holes included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the stack has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots whose scene is alive
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_live()).count()
    }

    /// Drop dead slots and renumber; returns the dropped slots
    pub fn compact(&mut self) -> Vec<StackSlot> {
        let (live, dead): (Vec<_>, Vec<_>) =
            self.slots.drain(..).partition(StackSlot::is_live);
        self.slots = live;
        dead
    }

    /// All slots
    pub fn slots(&self) -> &[StackSlot] {
        &self.slots
    }

    /// Identifiers, bottom to top
    pub fn identifiers(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.identifier.clone())
            .collect()
    }
}
