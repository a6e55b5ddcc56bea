use serde_json::{json, Map, Value};
use std::fmt::Write;

use crate::errors::{EngineError, Result};
use crate::model::{ComponentTree, NodeKey};

/// Canonical JSON rendering of the subtree rooted at `key`
///
/// Includes arena keys, so a recreated component changes the rendering
/// even when it looks the same. The pending-deletion marker is left out.
///
/// # Errors
///
/// Returns `NodeNotFound` if the subtree references a missing node.
pub fn canonical_tree(tree: &ComponentTree, key: NodeKey) -> Result<Value> {
    let component = tree.get(key)?;

    let children = component
        .children
        .iter()
        .map(|child| canonical_tree(tree, *child))
        .collect::<Result<Vec<_>>>()?;

    let mut facets = Map::new();
    for (name, slot) in &component.facets {
        facets.insert(name.clone(), canonical_tree(tree, *slot)?);
    }

    let attributes: Map<String, Value> = component
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(json!({
        "key": component.key.value(),
        "type": component.component_type,
        "id": component.id,
        "renderer_type": component.renderer_type,
        "created_by": component.created_by,
        "facet_wrapper": component.facet_wrapper,
        "view_location": component.view_location,
        "initial_state_marked": component.initial_state_marked,
        "binding": component.binding,
        "state": serde_json::to_value(&component.kind)?,
        "attributes": Value::Object(attributes),
        "children": children,
        "facets": Value::Object(facets),
    }))
}

/// Indented text outline of the whole tree
///
/// One line per component: type, id, tag-id and client id. Facet slots are
/// prefixed with `@name`, wrappers marked `[wrapper]`.
///
/// # Errors
///
/// Returns `NodeNotFound` if the tree references a missing node.
pub fn outline(tree: &ComponentTree) -> Result<String> {
    let mut out = String::new();
    write_outline(tree, tree.root(), 0, None, &mut out)?;
    Ok(out)
}

fn write_outline(
    tree: &ComponentTree,
    key: NodeKey,
    depth: usize,
    facet: Option<&str>,
    out: &mut String,
) -> Result<()> {
    let component = tree.get(key)?;
    let fmt_err = |e: std::fmt::Error| EngineError::Internal {
        message: e.to_string(),
    };

    write!(out, "{:indent$}", "", indent = depth * 2).map_err(fmt_err)?;
    if let Some(name) = facet {
        write!(out, "@{} ", name).map_err(fmt_err)?;
    }
    write!(
        out,
        "{} id={}",
        component.component_type,
        component.id.as_deref().unwrap_or("-")
    )
    .map_err(fmt_err)?;
    if let Some(tag_id) = &component.created_by {
        write!(out, " tag={}", tag_id).map_err(fmt_err)?;
    }
    if component.parent.is_some() {
        write!(out, " client_id={}", tree.client_id(key)?).map_err(fmt_err)?;
    }
    if component.facet_wrapper {
        write!(out, " [wrapper]").map_err(fmt_err)?;
    }
    writeln!(out).map_err(fmt_err)?;

    for (name, slot) in &component.facets {
        write_outline(tree, *slot, depth + 1, Some(name), out)?;
    }
    for child in &component.children {
        write_outline(tree, *child, depth + 1, None, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::{FORM_TYPE, PANEL_TYPE};
    use crate::model::capability::VendorState;
    use crate::model::ComponentKind;

    #[test]
    fn test_canonical_tree_lists_children_and_facets() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let form = tree.insert(FORM_TYPE, ComponentKind::Form(VendorState::default()));
        let header = tree.insert(PANEL_TYPE, ComponentKind::panel());
        tree.append_child(root, form).unwrap();
        tree.set_facet(root, "header", header).unwrap();

        let value = canonical_tree(&tree, root).unwrap();
        assert_eq!(value["children"].as_array().unwrap().len(), 1);
        assert_eq!(value["children"][0]["type"], FORM_TYPE);
        assert_eq!(value["facets"]["header"]["type"], PANEL_TYPE);
        assert_eq!(value["state"]["kind"], "view_root");
    }

    #[test]
    fn test_outline_shows_client_ids() {
        let mut tree = ComponentTree::new("/index.xhtml");
        let root = tree.root();
        let form = tree.insert(FORM_TYPE, ComponentKind::Form(VendorState::default()));
        tree.get_mut(form).unwrap().id = Some("form".to_string());
        tree.get_mut(form).unwrap().created_by = Some("t1".to_string());
        tree.append_child(root, form).unwrap();

        let text = outline(&tree).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "jakarta.faces.ViewRoot id=/index.xhtml");
        assert_eq!(lines[1], "  jakarta.faces.HtmlForm id=form tag=t1 client_id=form");
    }
}
