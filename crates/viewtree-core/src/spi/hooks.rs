use crate::errors::Result;
use crate::model::{ComponentTree, NodeKey};

/// Extension points around component construction
///
/// `on_component_created` runs once, right after a component is created
/// and its id assigned. `on_component_populated` runs on every pass after
/// the children are built, before the component is attached to its parent.
pub trait ComponentHooks {
    fn on_component_created(
        &self,
        _tree: &mut ComponentTree,
        _component: NodeKey,
        _parent: NodeKey,
    ) -> Result<()> {
        Ok(())
    }

    fn on_component_populated(
        &self,
        _tree: &mut ComponentTree,
        _component: NodeKey,
        _parent: NodeKey,
    ) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl ComponentHooks for NoopHooks {}
