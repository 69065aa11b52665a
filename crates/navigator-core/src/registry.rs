//! Scene factory and registry
//!
//! Scenes are built from identifiers through an explicit table populated at
//! application start. The router never inspects content types; the registry
//! entry declares whether the scene is a container.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{NavigatorError, Result};
use crate::scene::{ContainerKind, EmptyContent, Scene, SceneContent, SceneKind, SceneRef};

/// Identifier of the built-in placeholder scene
pub const PLACEHOLDER_IDENTIFIER: &str = "Placeholder";

/// Everything needed to instantiate a scene
pub struct SceneBlueprint {
    /// Content or container
    pub kind: SceneKind,
    /// Host content
    pub content: Box<dyn SceneContent>,
}

impl SceneBlueprint {
    /// Blueprint for a leaf scene
    pub fn content(content: impl SceneContent + 'static) -> Self {
        Self {
            kind: SceneKind::Content,
            content: Box::new(content),
        }
    }

    /// Blueprint for a container with no content of its own
    pub fn container(kind: ContainerKind) -> Self {
        Self {
            kind: SceneKind::Container(kind),
            content: Box::new(EmptyContent),
        }
    }

    /// Instantiate the scene under `identifier`
    pub fn instantiate(self, identifier: &str) -> SceneRef {
        Scene::new(identifier, self.kind, self.content)
    }
}

/// Builds scenes from identifiers
pub trait SceneFactory {
    /// Build the blueprint registered under `identifier`
    fn create(&self, identifier: &str) -> Option<SceneBlueprint>;

    /// Instantiate the scene registered under `identifier`
    fn instantiate(&self, identifier: &str) -> Result<SceneRef> {
        self.create(identifier)
            .map(|blueprint| blueprint.instantiate(identifier))
            .ok_or_else(|| NavigatorError::SceneNotFound(identifier.to_string()))
    }
}

/// Content of the built-in placeholder shown when nothing else resolves
#[derive(Debug, Default, Clone, Copy)]
pub struct Placeholder;

impl SceneContent for Placeholder {}

/// Instantiate the built-in placeholder scene
pub fn placeholder() -> SceneRef {
    SceneBlueprint::content(Placeholder).instantiate(PLACEHOLDER_IDENTIFIER)
}

type Constructor = Rc<dyn Fn() -> Box<dyn SceneContent>>;

struct Entry {
    kind: SceneKind,
    constructor: Constructor,
}

/// Identifier → constructor table
#[derive(Default)]
pub struct SceneRegistry {
    entries: HashMap<String, Entry>,
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf scene
    pub fn register<C, F>(&mut self, identifier: impl Into<String>, constructor: F) -> &mut Self
    where
        C: SceneContent + 'static,
        F: Fn() -> C + 'static,
    {
        self.entries.insert(
            identifier.into(),
            Entry {
                kind: SceneKind::Content,
                constructor: Rc::new(move || Box::new(constructor()) as Box<dyn SceneContent>),
            },
        );
        self
    }

    /// Register a container scene
    pub fn register_container(
        &mut self,
        identifier: impl Into<String>,
        kind: ContainerKind,
    ) -> &mut Self {
        self.entries.insert(
            identifier.into(),
            Entry {
                kind: SceneKind::Container(kind),
                constructor: Rc::new(|| Box::new(EmptyContent) as Box<dyn SceneContent>),
            },
        );
        self
    }

    /// Whether an identifier is registered
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Kind registered for an identifier
    pub fn kind_of(&self, identifier: &str) -> Option<SceneKind> {
        self.entries.get(identifier).map(|entry| entry.kind)
    }

    /// Number of registered identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SceneFactory for SceneRegistry {
    fn create(&self, identifier: &str) -> Option<SceneBlueprint> {
        self.entries.get(identifier).map(|entry| SceneBlueprint {
            kind: entry.kind,
            content: (entry.constructor)(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Home;
    impl SceneContent for Home {}

    #[test]
    fn test_register_and_instantiate() {
        let mut registry = SceneRegistry::new();
        registry
            .register("Home", || Home)
            .register_container("Tabs", ContainerKind::Tab);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.kind_of("Home"), Some(SceneKind::Content));

        let tabs = registry.instantiate("Tabs").unwrap();
        assert_eq!(tabs.container_kind(), Some(ContainerKind::Tab));
        assert_eq!(tabs.identifier(), "Tabs");

        let first = registry.instantiate("Home").unwrap();
        let second = registry.instantiate("Home").unwrap();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_missing_identifier() {
        let registry = SceneRegistry::new();
        let err = registry.instantiate("Nope").unwrap_err();
        assert!(matches!(err, NavigatorError::SceneNotFound(ref name) if name == "Nope"));
    }

    #[test]
    fn test_placeholder() {
        let scene = placeholder();
        assert_eq!(scene.identifier(), PLACEHOLDER_IDENTIFIER);
        assert!(!scene.is_container());
    }
}
