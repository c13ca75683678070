use enlace_error::error::NavError;
use enlace_types::{
    section_entries, Category, MenuNode, SectionKey, ABRAZANDO_LEYENDAS, ADMIN_USUARIOS,
    ORGANIZACIONES_FORMULARIOS, ORGANIZACIONES_LISTADO, PIMCO_BENEFICIARIOS, PIMCO_COMUNIDADES,
    PIMCO_ESTADISTICA, VOLUNTARIOS,
};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// The declared navigation tree, shared by every session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    nodes: Vec<MenuNode>,
}

impl Menu {
    /// Build a menu. Every node id must be unique across the tree, so a section
    /// key may appear once and no category may reuse a section key or another
    /// category's id.
    pub fn new(nodes: Vec<MenuNode>) -> Result<Self, NavError> {
        let mut seen = HashSet::new();
        for entry in section_entries(&nodes) {
            if !seen.insert(entry.key.as_str()) {
                return Err(NavError::DuplicateSection(entry.key.to_string()));
            }
        }

        for category in categories(&nodes) {
            if !seen.insert(category.id.as_str()) {
                return Err(NavError::DuplicateCategory(category.id.clone()));
            }
        }

        Ok(Self { nodes })
    }

    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let nodes: Vec<MenuNode> =
            serde_json::from_str(json).map_err(|e| NavError::MenuError(e.to_string()))?;
        Self::new(nodes)
    }

    pub fn from_path(path: &Path) -> Result<Self, NavError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            NavError::MenuError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Load the menu from `path` when given, otherwise use the built-in tree
    pub fn load(path: Option<&Path>) -> Result<Self, NavError> {
        match path {
            Some(path) => {
                info!("Loading navigation menu from {}", path.display());
                Self::from_path(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn section_keys(&self) -> Vec<&str> {
        section_entries(&self.nodes)
            .into_iter()
            .map(|entry| entry.key.as_str())
            .collect()
    }

    pub fn requires_data_keys(&self) -> Vec<&SectionKey> {
        section_entries(&self.nodes)
            .into_iter()
            .filter(|entry| entry.requires_data)
            .map(|entry| &entry.key)
            .collect()
    }
}

fn categories(nodes: &[MenuNode]) -> Vec<&Category> {
    let mut found = Vec::new();
    let mut stack: Vec<&MenuNode> = nodes.iter().collect();
    while let Some(node) = stack.pop() {
        if let MenuNode::Category(category) = node {
            found.push(category);
            stack.extend(category.children.iter());
        }
    }
    found
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            nodes: vec![
                MenuNode::category(
                    "pimco",
                    "PIMCO",
                    vec![
                        MenuNode::section(PIMCO_COMUNIDADES, "Comunidades").with_icon("map"),
                        MenuNode::section(PIMCO_BENEFICIARIOS, "Beneficiarios").with_icon("users"),
                        MenuNode::section(PIMCO_ESTADISTICA, "Estadistica")
                            .with_icon("chart")
                            .requiring_data(),
                    ],
                ),
                MenuNode::section(ABRAZANDO_LEYENDAS, "Abrazando Leyendas")
                    .with_icon("heart")
                    .requiring_data(),
                MenuNode::category(
                    "organizaciones",
                    "Organizaciones",
                    vec![
                        MenuNode::section(ORGANIZACIONES_LISTADO, "Listado"),
                        MenuNode::section(ORGANIZACIONES_FORMULARIOS, "Formularios")
                            .requiring_data(),
                    ],
                ),
                MenuNode::section(VOLUNTARIOS, "Voluntarios").with_icon("hand"),
                MenuNode::category(
                    "administracion",
                    "Administracion",
                    vec![MenuNode::section(ADMIN_USUARIOS, "Usuarios")],
                ),
            ],
        }
    }
}
