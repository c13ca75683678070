use crate::section::SectionKey;
use serde::{Deserialize, Serialize};

/// A navigable section in the static menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub key: SectionKey,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// The section is only useful when its backing dataset has rows.
    #[serde(default)]
    pub requires_data: bool,
}

/// A grouping of sections (or nested categories). Carries no permission of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub children: Vec<MenuNode>,
}

/// Node of the declared (unfiltered) menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuNode {
    Section(SectionEntry),
    Category(Category),
}

impl MenuNode {
    pub fn section(key: &str, label: &str) -> Self {
        MenuNode::Section(SectionEntry {
            key: SectionKey::from(key),
            label: label.to_string(),
            icon: None,
            requires_data: false,
        })
    }

    pub fn category(id: &str, label: &str, children: Vec<MenuNode>) -> Self {
        MenuNode::Category(Category {
            id: id.to_string(),
            label: label.to_string(),
            icon: None,
            children,
        })
    }

    /// Mark a section as requiring data. No-op on categories.
    pub fn requiring_data(mut self) -> Self {
        if let MenuNode::Section(entry) = &mut self {
            entry.requires_data = true;
        }
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        match &mut self {
            MenuNode::Section(entry) => entry.icon = Some(icon.to_string()),
            MenuNode::Category(category) => category.icon = Some(icon.to_string()),
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            MenuNode::Section(entry) => entry.key.as_str(),
            MenuNode::Category(category) => &category.id,
        }
    }
}

/// Collect every section entry of a tree in declaration order.
pub fn section_entries(nodes: &[MenuNode]) -> Vec<&SectionEntry> {
    let mut entries = Vec::new();
    collect_entries(nodes, &mut entries);
    entries
}

fn collect_entries<'a>(nodes: &'a [MenuNode], entries: &mut Vec<&'a SectionEntry>) {
    for node in nodes {
        match node {
            MenuNode::Section(entry) => entries.push(entry),
            MenuNode::Category(category) => collect_entries(&category.children, entries),
        }
    }
}

/// Render-ready navigation entry produced by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavItem {
    Section {
        key: SectionKey,
        label: String,
        icon: Option<String>,
        disabled: bool,
    },
    Category {
        id: String,
        label: String,
        icon: Option<String>,
        children: Vec<NavItem>,
    },
}

impl NavItem {
    pub fn id(&self) -> &str {
        match self {
            NavItem::Section { key, .. } => key.as_str(),
            NavItem::Category { id, .. } => id,
        }
    }

    pub fn children(&self) -> &[NavItem] {
        match self {
            NavItem::Section { .. } => &[],
            NavItem::Category { children, .. } => children,
        }
    }

    /// Whether `key` names this item or any section below it.
    pub fn contains_section(&self, key: &str) -> bool {
        match self {
            NavItem::Section { key: own, .. } => own.as_str() == key,
            NavItem::Category { children, .. } => {
                children.iter().any(|child| child.contains_section(key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_node_json_shape() {
        let json = r#"[
            {"kind": "category", "id": "pimco", "label": "PIMCO", "children": [
                {"kind": "section", "key": "pimco-comunidades", "label": "Comunidades"},
                {"kind": "section", "key": "pimco-estadistica", "label": "Estadistica", "requires_data": true}
            ]},
            {"kind": "section", "key": "abrazando-leyendas", "label": "Abrazando Leyendas"}
        ]"#;

        let nodes: Vec<MenuNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id(), "pimco");

        let entries = section_entries(&nodes);
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["pimco-comunidades", "pimco-estadistica", "abrazando-leyendas"]
        );
        assert!(entries[1].requires_data);
        assert!(!entries[0].requires_data);
    }

    #[test]
    fn test_nav_item_contains_section() {
        let item = NavItem::Category {
            id: "pimco".to_string(),
            label: "PIMCO".to_string(),
            icon: None,
            children: vec![NavItem::Section {
                key: SectionKey::from("pimco-comunidades"),
                label: "Comunidades".to_string(),
                icon: None,
                disabled: false,
            }],
        };

        assert!(item.contains_section("pimco-comunidades"));
        assert!(!item.contains_section("pimco"));
        assert_eq!(item.children().len(), 1);
    }
}
