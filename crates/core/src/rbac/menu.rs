//! Static menu registry.
//!
//! Menu ids are the unit of permission granting. The registry is compiled in; a
//! permission matrix may only reference ids that appear here.

use serde::Serialize;

/// A menu section of the dashboard, possibly with sub-menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuDescriptor {
    /// Stable key used in permission matrices.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Client route for the section (parents have none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'static str>,
    /// Sub-menus, empty for leaves.
    #[serde(skip_serializing_if = "no_children")]
    pub children: &'static [MenuDescriptor],
}

impl MenuDescriptor {
    const fn leaf(id: &'static str, name: &'static str, path: &'static str) -> Self {
        Self {
            id,
            name,
            path: Some(path),
            children: &[],
        }
    }

    const fn parent(
        id: &'static str,
        name: &'static str,
        children: &'static [Self],
    ) -> Self {
        Self {
            id,
            name,
            path: None,
            children,
        }
    }

    /// True when the menu has no sub-menus.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_children(children: &&'static [MenuDescriptor]) -> bool {
    children.is_empty()
}

const CONTENT_CHILDREN: &[MenuDescriptor] = &[
    MenuDescriptor::leaf("countries", "Countries", "/content/countries"),
    MenuDescriptor::leaf("cities", "Cities", "/content/cities"),
    MenuDescriptor::leaf("landmarks", "Landmarks", "/content/landmarks"),
    MenuDescriptor::leaf("museums", "Museums", "/content/museums"),
    MenuDescriptor::leaf("restaurants", "Restaurants", "/content/restaurants"),
    MenuDescriptor::leaf("golf_courses", "Golf Courses", "/content/golf-courses"),
    MenuDescriptor::leaf("shopping", "Shopping", "/content/shopping"),
];

const REGISTRY: &[MenuDescriptor] = &[
    MenuDescriptor::leaf("dashboard", "Dashboard", "/"),
    MenuDescriptor::parent("content", "Travel Content", CONTENT_CHILDREN),
    MenuDescriptor::leaf("content_library", "Content Library", "/content-library"),
    MenuDescriptor::leaf("magazine", "Jeudi Magazine", "/magazine"),
    MenuDescriptor::leaf("admin_mgmt", "Admin Accounts", "/admin-accounts"),
];

/// The top-level menus, in display order.
#[must_use]
pub const fn menu_registry() -> &'static [MenuDescriptor] {
    REGISTRY
}

/// Every menu id in the registry, parents before their children.
#[must_use]
pub fn all_menu_ids() -> Vec<&'static str> {
    fn walk(menus: &'static [MenuDescriptor], out: &mut Vec<&'static str>) {
        for menu in menus {
            out.push(menu.id);
            walk(menu.children, out);
        }
    }

    let mut ids = Vec::new();
    walk(REGISTRY, &mut ids);
    ids
}

/// Look up a menu anywhere in the registry.
#[must_use]
pub fn find_menu(id: &str) -> Option<&'static MenuDescriptor> {
    fn walk(menus: &'static [MenuDescriptor], id: &str) -> Option<&'static MenuDescriptor> {
        menus.iter().find_map(|menu| {
            if menu.id == id {
                Some(menu)
            } else {
                walk(menu.children, id)
            }
        })
    }

    walk(REGISTRY, id)
}

/// Whether `id` names a registered menu.
#[must_use]
pub fn is_known_menu(id: &str) -> bool {
    find_menu(id).is_some()
}

/// An owned, filtered view of the registry handed to clients as navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}
