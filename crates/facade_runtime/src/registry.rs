//! Live-tree bookkeeping
//!
//! The actor's name table: which names are live, what kind of widget
//! each one is, and the parent/child edges needed to release a whole
//! subtree on destroy. This is where the system-wide name-uniqueness
//! invariant is enforced.
//!
//! Anonymous widgets are not tracked; their named descendants hang off
//! the nearest named ancestor instead.

use facade_core::{UiError, Widget, WidgetKind};
use rustc_hash::{FxHashMap, FxHashSet};

struct Node {
    kind: WidgetKind,
    parent: Option<String>,
    children: Vec<String>,
}

/// Name → live-widget table, owned by the actor.
pub struct Registry {
    nodes: FxHashMap<String, Node>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<WidgetKind> {
        self.nodes.get(name).map(|node| node.kind)
    }

    /// Check that inserting `subtrees` would neither collide with a
    /// live name nor introduce the same name twice. Nothing is
    /// modified; a multi-child insertion is validated as one unit so
    /// it can be all-or-nothing.
    pub fn validate_insert<'a>(
        &self,
        subtrees: impl Iterator<Item = &'a Widget>,
    ) -> Result<(), UiError> {
        self.validate_insert_allowing(subtrees, &FxHashSet::default())
    }

    /// Like `validate_insert`, but names in `doomed` do not count as
    /// collisions - they belong to subtrees the same action is about
    /// to remove (replace-style actions may reuse them).
    pub fn validate_insert_allowing<'a>(
        &self,
        subtrees: impl Iterator<Item = &'a Widget>,
        doomed: &FxHashSet<String>,
    ) -> Result<(), UiError> {
        let mut batch: FxHashSet<String> = FxHashSet::default();
        for subtree in subtrees {
            for (name, _) in subtree.named_nodes() {
                let live = self.nodes.contains_key(&name) && !doomed.contains(&name);
                if live || !batch.insert(name.clone()) {
                    return Err(UiError::NameCollision(name));
                }
            }
        }
        Ok(())
    }

    /// Every live name inside the subtree rooted at `name`, including
    /// `name` itself.
    pub fn subtree_names(&self, name: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().cloned());
                names.push(current);
            }
        }
        names
    }

    /// Register every named node of `subtree`, hanging the top of the
    /// subtree off `parent`. Call only after `validate_insert`.
    pub fn insert_subtree(&mut self, parent: Option<&str>, subtree: &Widget) {
        self.insert_under(parent, subtree);
    }

    fn insert_under(&mut self, parent: Option<&str>, widget: &Widget) {
        let name = widget.name();
        let anchor = if name.is_empty() {
            // Anonymous: children attach to our own anchor.
            parent.map(str::to_string)
        } else {
            self.nodes.insert(
                name.to_string(),
                Node {
                    kind: widget.kind(),
                    parent: parent.map(str::to_string),
                    children: Vec::new(),
                },
            );
            if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
                parent.children.push(name.to_string());
            }
            Some(name.to_string())
        };
        for child in widget.children() {
            self.insert_under(anchor.as_deref(), child);
        }
    }

    /// Remove `name` and every descendant, returning all removed
    /// names. The names are free for reuse as soon as this returns.
    pub fn remove_subtree(&mut self, name: &str) -> Vec<String> {
        let parent = self.nodes.get(name).and_then(|node| node.parent.clone());
        let mut removed = Vec::new();
        self.remove_rec(name, &mut removed);
        // Detach from the parent's child list; descendants' edges died
        // with their nodes.
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|child| child != name);
        }
        removed
    }

    fn remove_rec(&mut self, name: &str, removed: &mut Vec<String>) {
        if let Some(node) = self.nodes.remove(name) {
            removed.push(name.to_string());
            for child in node.children {
                self.remove_rec(&child, removed);
            }
        }
    }

    /// Names of the direct children of a container.
    pub fn children_of(&self, name: &str) -> Vec<String> {
        self.nodes
            .get(name)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Forget everything. Used by `Reset`.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facade_core::{Button, Entry, HBox, Label, VBox};

    fn sample_tree() -> Widget {
        VBox::new("root")
            .child(
                HBox::new("row")
                    .child(Entry::new("e1"))
                    .child(Button::new("b1", "Go")),
            )
            .child(Label::new("status", ""))
            .into()
    }

    #[test]
    fn test_insert_tracks_every_named_node() {
        let mut registry = Registry::new();
        registry.insert_subtree(None, &sample_tree());
        for name in ["root", "row", "e1", "b1", "status"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.kind_of("e1"), Some(WidgetKind::Entry));
        assert_eq!(registry.children_of("row"), vec!["e1", "b1"]);
    }

    #[test]
    fn test_validate_rejects_live_collision() {
        let mut registry = Registry::new();
        registry.insert_subtree(None, &sample_tree());
        let dup: Widget = Label::new("e1", "imposter").into();
        assert_eq!(
            registry.validate_insert(std::iter::once(&dup)),
            Err(UiError::NameCollision("e1".into()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_within_batch() {
        let registry = Registry::new();
        let a: Widget = Label::new("x", "").into();
        let b: Widget = Button::new("x", "").into();
        assert_eq!(
            registry.validate_insert([&a, &b].into_iter()),
            Err(UiError::NameCollision("x".into()))
        );
    }

    #[test]
    fn test_remove_subtree_releases_descendants() {
        let mut registry = Registry::new();
        registry.insert_subtree(None, &sample_tree());
        let mut removed = registry.remove_subtree("row");
        removed.sort();
        assert_eq!(removed, vec!["b1", "e1", "row"]);
        assert!(!registry.contains("e1"));
        assert!(registry.contains("root"));
        assert!(registry.children_of("root").iter().all(|c| c != "row"));
        // Freed names are reusable.
        assert!(registry
            .validate_insert(std::iter::once(
                &Widget::from(Entry::new("e1"))
            ))
            .is_ok());
    }

    #[test]
    fn test_anonymous_wrapper_links_to_named_ancestor() {
        let mut registry = Registry::new();
        let tree: Widget = VBox::new("root")
            .child(HBox::new("").child(Button::new("ok", "OK")))
            .into();
        registry.insert_subtree(None, &tree);
        assert!(!registry.contains(""));
        assert_eq!(registry.children_of("root"), vec!["ok"]);
        let removed = registry.remove_subtree("root");
        assert_eq!(removed.len(), 2);
    }
}
