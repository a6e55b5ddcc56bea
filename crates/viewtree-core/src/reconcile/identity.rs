use crate::model::{ComponentTree, NodeKey};

/// Find the child of `parent` created by the tag with `tag_id`
///
/// Looks at the children in order, then at the facet slots in name order,
/// then inside engine-synthesized facet wrappers. Matches on `created_by`,
/// never on the rendered id. If foreign code broke tag-id uniqueness the
/// first match in that order wins.
pub fn find_child_by_tag_id(tree: &ComponentTree, parent: NodeKey, tag_id: &str) -> Option<NodeKey> {
    let created_by = |key: NodeKey| {
        tree.get(key)
            .ok()
            .and_then(|c| c.created_by.as_deref())
            == Some(tag_id)
    };

    let component = tree.get(parent).ok()?;
    if let Some(found) = component.children.iter().find(|k| created_by(**k)) {
        return Some(*found);
    }
    if let Some(found) = component.facets.values().find(|k| created_by(**k)) {
        return Some(*found);
    }
    component
        .facets
        .values()
        .filter_map(|slot| tree.get(*slot).ok())
        .filter(|slot| slot.facet_wrapper)
        .flat_map(|wrapper| wrapper.children.iter())
        .find(|k| created_by(**k))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::{OUTPUT_TEXT_TYPE, PANEL_TYPE};
    use crate::model::ComponentKind;

    fn tagged(tree: &mut ComponentTree, ty: &str, kind: ComponentKind, tag_id: Option<&str>) -> NodeKey {
        let key = tree.insert(ty, kind);
        tree.get_mut(key).unwrap().created_by = tag_id.map(str::to_string);
        key
    }

    #[test]
    fn test_finds_plain_child_by_tag_id_not_by_id() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let a = tagged(&mut tree, OUTPUT_TEXT_TYPE, ComponentKind::Generic, Some("t1"));
        tree.get_mut(a).unwrap().id = Some("t2".to_string());
        tree.append_child(root, a).unwrap();

        assert_eq!(find_child_by_tag_id(&tree, root, "t1"), Some(a));
        assert_eq!(find_child_by_tag_id(&tree, root, "t2"), None);
    }

    #[test]
    fn test_finds_facet_slot_and_wrapped_children() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let header = tagged(&mut tree, PANEL_TYPE, ComponentKind::panel(), Some("t1"));
        tree.set_facet(root, "header", header).unwrap();

        let wrapper = tagged(&mut tree, PANEL_TYPE, ComponentKind::panel(), None);
        tree.get_mut(wrapper).unwrap().facet_wrapper = true;
        tree.set_facet(root, "footer", wrapper).unwrap();
        let inner = tagged(&mut tree, OUTPUT_TEXT_TYPE, ComponentKind::Generic, Some("t3"));
        tree.append_child(wrapper, inner).unwrap();

        assert_eq!(find_child_by_tag_id(&tree, root, "t1"), Some(header));
        assert_eq!(find_child_by_tag_id(&tree, root, "t3"), Some(inner));
    }

    #[test]
    fn test_does_not_descend_into_grandchildren() {
        let mut tree = ComponentTree::new("v");
        let root = tree.root();
        let panel = tagged(&mut tree, PANEL_TYPE, ComponentKind::panel(), Some("t1"));
        let inner = tagged(&mut tree, OUTPUT_TEXT_TYPE, ComponentKind::Generic, Some("t2"));
        tree.append_child(root, panel).unwrap();
        tree.append_child(panel, inner).unwrap();

        assert_eq!(find_child_by_tag_id(&tree, root, "t2"), None);
    }

    #[test]
    fn test_missing_parent_finds_nothing() {
        let tree = ComponentTree::new("v");
        assert_eq!(find_child_by_tag_id(&tree, NodeKey(99), "t1"), None);
    }
}
