//! Status and role enums.
//!
//! All of these round-trip through `snake_case` strings, both in JSON and in the
//! `TEXT` columns that store them.

use serde::{Deserialize, Serialize};

/// Error returned when a status or role string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    /// What was being parsed (e.g. "admin role").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The canonical `snake_case` string for this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseStatusError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

/// Admin role.
///
/// `SuperAdmin` always resolves to full permissions; the other roles are governed
/// entirely by their stored permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to everything, including account management.
    SuperAdmin,
    /// Edits travel content and the content library.
    ContentManager,
    /// Marketing staff (magazine, promotions).
    Marketer,
}

string_enum!(AdminRole, "admin role", {
    SuperAdmin => "super_admin",
    ContentManager => "content_manager",
    Marketer => "marketer",
});

impl AdminRole {
    /// Human-readable label for list views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::ContentManager => "Content Manager",
            Self::Marketer => "Marketer",
        }
    }
}

/// Whether an admin account may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

string_enum!(AccountStatus, "account status", {
    Active => "active",
    Inactive => "inactive",
});

/// Publication status of a domain entity.
///
/// The vocabulary is shared by every collection even though a given list page may
/// only offer a subset of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    #[default]
    Draft,
    Active,
    Published,
    Archived,
}

string_enum!(PublishStatus, "publish status", {
    Draft => "draft",
    Active => "active",
    Published => "published",
    Archived => "archived",
});
