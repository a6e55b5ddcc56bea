use serde_json::Value;
use std::collections::BTreeMap;

use super::component::NodeKey;
use super::tree::ComponentTree;

/// A view: the component tree plus the number of passes built against it
///
/// The view root is the synthetic parent every top-level tag is applied to.
#[derive(Debug, Clone)]
pub struct View {
    view_id: String,
    tree: ComponentTree,
    passes: u64,
    variables: BTreeMap<String, Value>,
}

impl View {
    pub fn new(view_id: impl Into<String>) -> Self {
        let view_id = view_id.into();
        Self {
            tree: ComponentTree::new(view_id.clone()),
            view_id,
            passes: 0,
            variables: BTreeMap::new(),
        }
    }

    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    pub fn root(&self) -> NodeKey {
        self.tree.root()
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    /// Passes started against this view, failed ones included
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Variables visible to every expression of later passes
    pub fn variables(&self) -> &BTreeMap<String, Value> {
        &self.variables
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    pub(crate) fn begin_pass(&mut self) -> u64 {
        self.passes += 1;
        self.passes
    }
}
