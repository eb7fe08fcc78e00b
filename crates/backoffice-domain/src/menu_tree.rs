//! Menu hierarchy: forest assembly and parent validation.
//!
//! Menus form a forest through `parent_id`. Two operations live here because
//! both the admin tree view and the authorization resolver need them:
//!
//! - [`build_forest`] turns a flat set of rows into ordered trees. Siblings are
//!   ordered by `(sort, name, id)`. A row whose parent is absent from the input
//!   set becomes a root.
//! - [`check_parent`] validates a `parent_id` write against the current
//!   parent index so no chain of `parent_id` lookups can revisit a node.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::kind::MenuType;

/// Flat menu row as needed for tree assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub path: String,
    pub component: Option<String>,
    pub icon: String,
    pub menu_type: MenuType,
    pub visible: bool,
    pub sort: i32,
    pub permission_code: Option<String>,
}

/// A menu with its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub path: String,
    pub component: Option<String>,
    pub icon: String,
    #[serde(rename = "type")]
    pub menu_type: MenuType,
    pub visible: bool,
    pub sort: i32,
    pub permission_code: Option<String>,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    fn leaf(entry: &MenuEntry) -> Self {
        Self {
            id: entry.id,
            parent_id: entry.parent_id,
            name: entry.name.clone(),
            path: entry.path.clone(),
            component: entry.component.clone(),
            icon: entry.icon.clone(),
            menu_type: entry.menu_type,
            visible: entry.visible,
            sort: entry.sort,
            permission_code: entry.permission_code.clone(),
            children: Vec::new(),
        }
    }

    /// Ids of this node and all descendants, depth first.
    pub fn ids(&self) -> Vec<Uuid> {
        let mut out = vec![self.id];
        for child in &self.children {
            out.extend(child.ids());
        }
        out
    }
}

type SiblingKey = (i32, String, Uuid);

fn sibling_key(entry: &MenuEntry) -> SiblingKey {
    (entry.sort, entry.name.clone(), entry.id)
}

/// Assemble an ordered forest from a flat set of menu rows.
///
/// Duplicate ids are collapsed. The result depends only on the set of rows,
/// not on their order in `entries`.
pub fn build_forest(entries: impl IntoIterator<Item = MenuEntry>) -> Vec<MenuNode> {
    let mut by_id: BTreeMap<Uuid, MenuEntry> = BTreeMap::new();
    for entry in entries {
        by_id.entry(entry.id).or_insert(entry);
    }

    let mut children: HashMap<Uuid, BTreeMap<SiblingKey, Uuid>> = HashMap::new();
    let mut roots: BTreeMap<SiblingKey, Uuid> = BTreeMap::new();
    for entry in by_id.values() {
        match entry.parent_id.filter(|parent| by_id.contains_key(parent)) {
            Some(parent) if parent != entry.id => {
                children
                    .entry(parent)
                    .or_default()
                    .insert(sibling_key(entry), entry.id);
            }
            _ => {
                roots.insert(sibling_key(entry), entry.id);
            }
        }
    }

    let mut visited = HashSet::with_capacity(by_id.len());
    let mut forest: Vec<MenuNode> = roots
        .values()
        .filter_map(|id| attach(*id, &by_id, &children, &mut visited))
        .collect();

    // Rows caught in a parent cycle are unreachable from any root. Surface them
    // as extra roots instead of dropping them.
    let stranded: BTreeMap<SiblingKey, Uuid> = by_id
        .values()
        .filter(|entry| !visited.contains(&entry.id))
        .map(|entry| (sibling_key(entry), entry.id))
        .collect();
    for id in stranded.values() {
        if let Some(node) = attach(*id, &by_id, &children, &mut visited) {
            forest.push(node);
        }
    }
    forest
}

fn attach(
    id: Uuid,
    by_id: &BTreeMap<Uuid, MenuEntry>,
    children: &HashMap<Uuid, BTreeMap<SiblingKey, Uuid>>,
    visited: &mut HashSet<Uuid>,
) -> Option<MenuNode> {
    if !visited.insert(id) {
        return None;
    }
    let mut node = MenuNode::leaf(by_id.get(&id)?);
    if let Some(kids) = children.get(&id) {
        node.children = kids
            .values()
            .filter_map(|child| attach(*child, by_id, children, visited))
            .collect();
    }
    Some(node)
}

/// Rejection reasons for a `parent_id` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParentError {
    #[error("parent menu does not exist")]
    UnknownParent,
    #[error("menu cannot be its own ancestor")]
    Cycle,
}

/// Validate setting `parent` as the parent of `menu`.
///
/// `menu` is `None` when the menu is being created. `parents` maps every
/// existing menu id to its current parent.
pub fn check_parent(
    menu: Option<Uuid>,
    parent: Uuid,
    parents: &HashMap<Uuid, Option<Uuid>>,
) -> Result<(), ParentError> {
    if !parents.contains_key(&parent) {
        return Err(ParentError::UnknownParent);
    }
    let Some(menu) = menu else {
        return Ok(());
    };

    let mut cursor = Some(parent);
    let mut steps = 0usize;
    while let Some(current) = cursor {
        if current == menu {
            return Err(ParentError::Cycle);
        }
        steps += 1;
        if steps > parents.len() {
            // Existing data already loops; refuse to extend it.
            return Err(ParentError::Cycle);
        }
        cursor = parents.get(&current).copied().flatten();
    }
    Ok(())
}
