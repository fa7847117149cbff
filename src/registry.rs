//! Ordered registry of effect passes.
//!
//! Insertion order is evaluation order. Toggling a pass on or off never
//! reorders anything — the chain walks the registry front to back every
//! frame and simply skips disabled entries.

use crate::error::ChainError;
use crate::pass::EffectPass;

/// The chain's ordered collection of passes.
///
/// The registry is the sole owner of every pass: callers get borrowed access
/// for lookups and parameter tweaks, never ownership. Names are unique within
/// one registry because they are the key for name-based toggling.
#[derive(Default)]
pub struct PassRegistry {
    passes: Vec<Box<dyn EffectPass>>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub(crate) fn insert(&mut self, pass: Box<dyn EffectPass>) -> Result<usize, ChainError> {
        if self.passes.iter().any(|p| p.name() == pass.name()) {
            return Err(ChainError::DuplicatePassName(pass.name().to_string()));
        }
        self.passes.push(pass);
        Ok(self.passes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn EffectPass> {
        self.passes.get(index).map(|p| &**p)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn EffectPass> {
        self.passes.get_mut(index).map(|p| &mut **p)
    }

    pub fn by_name(&self, name: &str) -> Option<&dyn EffectPass> {
        self.passes.iter().find(|p| p.name() == name).map(|p| &**p)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut dyn EffectPass> {
        self.passes
            .iter_mut()
            .find(|p| p.name() == name)
            .map(|p| &mut **p)
    }

    /// Borrow a pass back as its concrete type, e.g. to reach typed setters.
    pub fn downcast_mut<P: EffectPass>(&mut self, index: usize) -> Option<&mut P> {
        self.get_mut(index)?.as_any_mut().downcast_mut::<P>()
    }

    /// Toggle by index. Returns false when the index is out of range.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.passes.get_mut(index) {
            Some(pass) => {
                pass.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Toggle by name. Returns false when no pass has that name.
    pub fn set_enabled_by_name(&mut self, name: &str, enabled: bool) -> bool {
        match self.by_name_mut(name) {
            Some(pass) => {
                pass.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    pub fn disable_all(&mut self) {
        for pass in &mut self.passes {
            pass.set_enabled(false);
        }
    }

    /// Passes in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn EffectPass> {
        self.passes.iter().map(|p| &**p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::{PassToggle, RenderContext};
    use std::any::Any;

    struct StubPass {
        toggle: PassToggle,
        compatible: bool,
    }

    impl StubPass {
        fn named(name: &'static str) -> Self {
            Self {
                toggle: PassToggle::new(name),
                compatible: true,
            }
        }
    }

    impl EffectPass for StubPass {
        fn name(&self) -> &str {
            self.toggle.name()
        }
        fn enabled(&self) -> bool {
            self.toggle.enabled()
        }
        fn set_enabled(&mut self, enabled: bool) {
            self.toggle.set(enabled);
        }
        fn compatible(&self) -> bool {
            self.compatible
        }
        fn render(
            &self,
            _ctx: &mut RenderContext,
            _source: &wgpu::TextureView,
            _destination: &wgpu::TextureView,
            _depth: &wgpu::TextureView,
        ) {
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut registry = PassRegistry::new();
        registry.insert(Box::new(StubPass::named("a"))).unwrap();
        registry.insert(Box::new(StubPass::named("b"))).unwrap();
        registry.insert(Box::new(StubPass::named("c"))).unwrap();

        let names: Vec<&str> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn order_survives_toggling() {
        let mut registry = PassRegistry::new();
        registry.insert(Box::new(StubPass::named("a"))).unwrap();
        registry.insert(Box::new(StubPass::named("b"))).unwrap();

        // Enable in reverse order; evaluation order must not change.
        registry.disable_all();
        assert!(registry.set_enabled_by_name("b", true));
        assert!(registry.set_enabled_by_name("a", true));

        let names: Vec<&str> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = PassRegistry::new();
        registry.insert(Box::new(StubPass::named("fxaa"))).unwrap();
        let err = registry.insert(Box::new(StubPass::named("fxaa")));
        assert!(matches!(err, Err(ChainError::DuplicatePassName(n)) if n == "fxaa"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_by_name_and_index_agree() {
        let mut registry = PassRegistry::new();
        let index = registry.insert(Box::new(StubPass::named("edge"))).unwrap();
        assert_eq!(registry.get(index).map(|p| p.name()), Some("edge"));
        assert!(registry.by_name("edge").is_some());
        assert!(registry.by_name("missing").is_none());
        assert!(!registry.set_enabled(99, true));
    }

    #[test]
    fn downcast_reaches_concrete_type() {
        let mut registry = PassRegistry::new();
        let index = registry.insert(Box::new(StubPass::named("a"))).unwrap();
        assert!(registry.downcast_mut::<StubPass>(index).is_some());
    }
}
