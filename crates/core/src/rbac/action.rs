//! Actions and per-menu action flags.

use serde::{Deserialize, Serialize};

/// An operation an admin may perform on a menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Every action, in display order.
    pub const ALL: [Self; 4] = [Self::View, Self::Create, Self::Update, Self::Delete];

    /// The lowercase key used in stored matrices.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four permission flags for one menu.
///
/// Absent keys deserialize as `false`, so a stored `{"view": true}` grants view only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionFlags {
    pub view: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl ActionFlags {
    /// Everything granted.
    pub const ALL: Self = Self {
        view: true,
        create: true,
        update: true,
        delete: true,
    };

    /// Nothing granted.
    pub const NONE: Self = Self {
        view: false,
        create: false,
        update: false,
        delete: false,
    };

    /// Whether `action` is granted.
    #[must_use]
    pub const fn allows(self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Set a single flag.
    pub const fn set(&mut self, action: Action, granted: bool) {
        match action {
            Action::View => self.view = granted,
            Action::Create => self.create = granted,
            Action::Update => self.update = granted,
            Action::Delete => self.delete = granted,
        }
    }

    /// True when no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.view || self.create || self.update || self.delete)
    }
}
