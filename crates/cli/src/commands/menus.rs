//! Print the menu registry.

use vacance_core::rbac::{MenuDescriptor, menu_registry};

/// Render the registry as an indented tree of `id  name  path` lines.
#[must_use]
pub fn render() -> String {
    let mut out = String::new();
    write_menus(&mut out, menu_registry(), 0);
    out
}

fn write_menus(out: &mut String, menus: &[MenuDescriptor], depth: usize) {
    for menu in menus {
        let indent = "  ".repeat(depth);
        let path = menu.path.unwrap_or("-");
        out.push_str(&format!("{indent}{:<18}{:<20}{path}\n", menu.id, menu.name));
        write_menus(out, menu.children, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_menu_once() {
        let output = render();
        for id in vacance_core::rbac::all_menu_ids() {
            let count = output
                .lines()
                .filter(|line| line.split_whitespace().next() == Some(id))
                .count();
            assert_eq!(count, 1, "{id}");
        }
    }

    #[test]
    fn test_children_are_indented() {
        let output = render();
        assert!(output.lines().any(|line| line.starts_with("  museums")));
        assert!(output.lines().any(|line| line.starts_with("content ")));
    }
}
