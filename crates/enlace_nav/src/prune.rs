//! Pruning of the declared menu down to what a session may see.
//!
//! Categories never carry permissions of their own: a category survives only
//! when at least one descendant section survives, and survivors keep their
//! declared order.
use enlace_types::{MenuNode, NavItem, RequiresDataPolicy, SectionAccess, SectionKey};
use std::collections::BTreeMap;

/// Answers whether the dataset behind a `requires_data` section has rows.
pub trait DataAvailability {
    fn has_data(&self, key: &str) -> bool;
}

/// Used when dataset information is not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeData;

impl DataAvailability for AssumeData {
    fn has_data(&self, _key: &str) -> bool {
        true
    }
}

/// Sections missing from the map are treated as having data.
impl DataAvailability for BTreeMap<SectionKey, bool> {
    fn has_data(&self, key: &str) -> bool {
        self.get(key).copied().unwrap_or(true)
    }
}

/// Keep only the entries `access` permits. Dataset emptiness is ignored.
pub fn prune<A: SectionAccess>(nodes: &[MenuNode], access: &A) -> Vec<NavItem> {
    prune_with_data(nodes, access, RequiresDataPolicy::Show, &AssumeData)
}

pub fn prune_with_data<A, D>(
    nodes: &[MenuNode],
    access: &A,
    policy: RequiresDataPolicy,
    data: &D,
) -> Vec<NavItem>
where
    A: SectionAccess,
    D: DataAvailability,
{
    nodes
        .iter()
        .filter_map(|node| prune_node(node, access, policy, data))
        .collect()
}

fn prune_node<A, D>(
    node: &MenuNode,
    access: &A,
    policy: RequiresDataPolicy,
    data: &D,
) -> Option<NavItem>
where
    A: SectionAccess,
    D: DataAvailability,
{
    match node {
        MenuNode::Section(entry) => {
            if !access.can_view_section(entry.key.as_str()) {
                return None;
            }

            let empty = entry.requires_data && !data.has_data(entry.key.as_str());
            let disabled = match policy {
                RequiresDataPolicy::Show => false,
                RequiresDataPolicy::Disable => empty,
                RequiresDataPolicy::Hide if empty => return None,
                RequiresDataPolicy::Hide => false,
            };

            Some(NavItem::Section {
                key: entry.key.clone(),
                label: entry.label.clone(),
                icon: entry.icon.clone(),
                disabled,
            })
        }
        MenuNode::Category(category) => {
            let children = prune_with_data(&category.children, access, policy, data);
            if children.is_empty() {
                return None;
            }

            Some(NavItem::Category {
                id: category.id.clone(),
                label: category.label.clone(),
                icon: category.icon.clone(),
                children,
            })
        }
    }
}

/// The requested section if it is rendered and enabled, for highlighting.
pub fn active_section(items: &[NavItem], requested: Option<&str>) -> Option<SectionKey> {
    let requested = requested?;
    items.iter().find_map(|item| find_enabled(item, requested))
}

fn find_enabled(item: &NavItem, requested: &str) -> Option<SectionKey> {
    match item {
        NavItem::Section { key, disabled, .. } if key.as_str() == requested && !disabled => {
            Some(key.clone())
        }
        NavItem::Section { .. } => None,
        NavItem::Category { children, .. } => {
            children.iter().find_map(|child| find_enabled(child, requested))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn allowed(keys: &[&str]) -> HashSet<SectionKey> {
        keys.iter().map(|key| SectionKey::from(*key)).collect()
    }

    fn sample_tree() -> Vec<MenuNode> {
        vec![
            MenuNode::category(
                "pimco",
                "PIMCO",
                vec![
                    MenuNode::section("pimco-comunidades", "Comunidades"),
                    MenuNode::section("pimco-estadistica", "Estadistica").requiring_data(),
                ],
            ),
            MenuNode::section("abrazando-leyendas", "Abrazando Leyendas"),
        ]
    }

    fn ids(items: &[NavItem]) -> Vec<String> {
        items.iter().map(|item| item.id().to_string()).collect()
    }

    struct Everything;

    impl SectionAccess for Everything {
        fn can_view_section(&self, _key: &str) -> bool {
            true
        }

        fn is_admin(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_parent_kept_with_permitted_child() {
        let pruned = prune(&sample_tree(), &allowed(&["pimco-comunidades"]));

        assert_eq!(ids(&pruned), vec!["pimco"]);
        assert_eq!(ids(pruned[0].children()), vec!["pimco-comunidades"]);
    }

    #[test]
    fn test_empty_permissions_prune_everything() {
        let pruned = prune(&sample_tree(), &allowed(&[]));
        assert!(pruned.is_empty());
    }

    #[test]
    fn test_parent_dropped_without_children() {
        let pruned = prune(&sample_tree(), &allowed(&["abrazando-leyendas"]));

        assert_eq!(ids(&pruned), vec!["abrazando-leyendas"]);
        assert!(pruned[0].children().is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let tree = vec![
            MenuNode::section("c", "C"),
            MenuNode::category(
                "group",
                "Group",
                vec![
                    MenuNode::section("z", "Z"),
                    MenuNode::section("a", "A"),
                    MenuNode::section("m", "M"),
                ],
            ),
            MenuNode::section("b", "B"),
        ];

        let pruned = prune(&tree, &allowed(&["b", "c", "m", "z"]));
        assert_eq!(ids(&pruned), vec!["c", "group", "b"]);
        assert_eq!(ids(pruned[1].children()), vec!["z", "m"]);
    }

    #[test]
    fn test_nested_categories() {
        let tree = vec![MenuNode::category(
            "outer",
            "Outer",
            vec![
                MenuNode::category("empty", "Empty", vec![MenuNode::section("x", "X")]),
                MenuNode::category("inner", "Inner", vec![MenuNode::section("y", "Y")]),
            ],
        )];

        let pruned = prune(&tree, &allowed(&["y"]));
        assert_eq!(ids(&pruned), vec!["outer"]);
        assert_eq!(ids(pruned[0].children()), vec!["inner"]);
        assert_eq!(ids(pruned[0].children()[0].children()), vec!["y"]);

        assert!(prune(&tree, &allowed(&["outer", "inner"])).is_empty());
    }

    #[test]
    fn test_every_surviving_leaf_is_permitted() {
        let tree = sample_tree();
        let permitted = allowed(&["pimco-estadistica", "abrazando-leyendas"]);

        fn leaves(items: &[NavItem], out: &mut Vec<String>) {
            for item in items {
                match item {
                    NavItem::Section { key, .. } => out.push(key.to_string()),
                    NavItem::Category { children, .. } => leaves(children, out),
                }
            }
        }

        let mut out = Vec::new();
        leaves(&prune(&tree, &permitted), &mut out);
        assert_eq!(out, vec!["pimco-estadistica", "abrazando-leyendas"]);
        assert!(out.iter().all(|key| permitted.can_view_section(key)));
    }

    #[test]
    fn test_admin_sees_whole_tree() {
        let pruned = prune(&sample_tree(), &Everything);
        assert_eq!(ids(&pruned), vec!["pimco", "abrazando-leyendas"]);
        assert_eq!(pruned[0].children().len(), 2);
    }

    #[test]
    fn test_requires_data_policies() {
        let tree = vec![MenuNode::category(
            "pimco",
            "PIMCO",
            vec![MenuNode::section("pimco-estadistica", "Estadistica").requiring_data()],
        )];
        let mut data = BTreeMap::new();
        data.insert(SectionKey::from("pimco-estadistica"), false);

        let shown = prune_with_data(&tree, &Everything, RequiresDataPolicy::Show, &data);
        assert_eq!(shown, prune(&tree, &Everything));

        let disabled = prune_with_data(&tree, &Everything, RequiresDataPolicy::Disable, &data);
        assert!(matches!(
            disabled[0].children()[0],
            NavItem::Section { disabled: true, .. }
        ));

        // hiding the only child removes the category as well
        let hidden = prune_with_data(&tree, &Everything, RequiresDataPolicy::Hide, &data);
        assert!(hidden.is_empty());

        data.insert(SectionKey::from("pimco-estadistica"), true);
        let hidden = prune_with_data(&tree, &Everything, RequiresDataPolicy::Hide, &data);
        assert_eq!(ids(&hidden), vec!["pimco"]);
    }

    #[test]
    fn test_requires_data_ignored_without_flag() {
        let tree = vec![MenuNode::section("voluntarios", "Voluntarios")];
        let mut data = BTreeMap::new();
        data.insert(SectionKey::from("voluntarios"), false);

        let pruned = prune_with_data(&tree, &Everything, RequiresDataPolicy::Hide, &data);
        assert_eq!(ids(&pruned), vec!["voluntarios"]);
    }

    #[test]
    fn test_active_section() {
        let tree = sample_tree();
        let mut data = BTreeMap::new();
        data.insert(SectionKey::from("pimco-estadistica"), false);
        let items = prune_with_data(&tree, &Everything, RequiresDataPolicy::Disable, &data);

        assert_eq!(
            active_section(&items, Some("pimco-comunidades")),
            Some(SectionKey::from("pimco-comunidades"))
        );
        assert_eq!(active_section(&items, Some("pimco-estadistica")), None);
        assert_eq!(active_section(&items, Some("pimco")), None);
        assert_eq!(active_section(&items, Some("admin-usuarios")), None);
        assert_eq!(active_section(&items, None), None);
    }
}
