//! Per-account permission matrix.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::{Action, ActionFlags};
use super::menu::{all_menu_ids, is_known_menu};

/// Mapping from menu id to the actions granted on it.
///
/// Stored as a JSON object (`{"content": {"view": true, ...}}`) on the account record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, ActionFlags>);

impl PermissionMatrix {
    /// An empty matrix (grants nothing).
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// All four actions on every registered menu.
    #[must_use]
    pub fn full_access() -> Self {
        Self(
            all_menu_ids()
                .into_iter()
                .map(|id| (id.to_owned(), ActionFlags::ALL))
                .collect(),
        )
    }

    /// Flags stored for `menu_id`, if any.
    #[must_use]
    pub fn get(&self, menu_id: &str) -> Option<ActionFlags> {
        self.0.get(menu_id).copied()
    }

    /// Set one flag, creating the menu entry if needed.
    pub fn set(&mut self, menu_id: &str, action: Action, granted: bool) {
        self.0
            .entry(menu_id.to_owned())
            .or_default()
            .set(action, granted);
    }

    /// Replace every flag of one menu.
    pub fn set_flags(&mut self, menu_id: &str, flags: ActionFlags) {
        self.0.insert(menu_id.to_owned(), flags);
    }

    /// Whether every registered menu has every action granted.
    #[must_use]
    pub fn is_full_access(&self) -> bool {
        all_menu_ids()
            .into_iter()
            .all(|id| self.get(id) == Some(ActionFlags::ALL))
    }

    /// Menu ids present in the matrix that the registry does not know.
    #[must_use]
    pub fn unknown_menus(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|id| !is_known_menu(id))
            .collect()
    }

    /// Iterate over `(menu id, flags)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ActionFlags)> {
        self.0.iter().map(|(id, flags)| (id.as_str(), *flags))
    }

    /// Number of menu entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the matrix has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ActionFlags)> for PermissionMatrix {
    fn from_iter<I: IntoIterator<Item = (String, ActionFlags)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
