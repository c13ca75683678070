use crate::schema::RoleAssignment;
use async_trait::async_trait;
use enlace_error::error::SqlError;
use enlace_sql::base::SqlClient;
use enlace_sql::enums::client::SqlClientEnum;
use enlace_sql::schemas::schema::RoleGrant;
use enlace_types::{SectionAccess, SectionKey};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Sections granted to one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    pub name: String,
    pub is_admin: bool,
    pub sections: BTreeSet<SectionKey>,
}

/// Role -> sections capability table. Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    roles: BTreeMap<String, RoleEntry>,
}

impl RoleTable {
    /// Build the table from flattened role/section rows (one row per grant,
    /// `section_key` is `None` for roles without any grant)
    pub fn from_grants(grants: Vec<RoleGrant>) -> Self {
        let mut roles: BTreeMap<String, RoleEntry> = BTreeMap::new();

        for grant in grants {
            let entry = roles
                .entry(grant.role.clone())
                .or_insert_with(|| RoleEntry {
                    name: grant.role.clone(),
                    is_admin: grant.is_admin,
                    sections: BTreeSet::new(),
                });

            if let Some(section_key) = grant.section_key {
                entry.sections.insert(SectionKey::from(section_key));
            }
        }

        Self { roles }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    pub fn get(&self, role: &str) -> Option<&RoleEntry> {
        self.roles.get(role)
    }

    pub fn role_names(&self) -> Vec<&str> {
        self.roles.keys().map(String::as_str).collect()
    }

    /// Section keys granted to any role that are not in `known`
    pub fn unknown_sections<'a>(&'a self, known: &[&str]) -> Vec<&'a SectionKey> {
        self.roles
            .values()
            .flat_map(|entry| entry.sections.iter())
            .filter(|key| !known.contains(&key.as_str()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolve a user's role assignment into the permission set of their session
    pub fn resolve(&self, assignment: &RoleAssignment) -> PermissionSet {
        if !assignment.active {
            return PermissionSet::empty(&assignment.role);
        }

        match self.roles.get(&assignment.role) {
            Some(entry) => PermissionSet {
                role: entry.name.clone(),
                admin: entry.is_admin,
                sections: entry.sections.clone(),
            },
            None => {
                warn!("Role {} is not in the capability table", assignment.role);
                PermissionSet::empty(&assignment.role)
            }
        }
    }
}

/// What one session may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    role: String,
    admin: bool,
    sections: BTreeSet<SectionKey>,
}

impl PermissionSet {
    pub fn new(role: &str, admin: bool, sections: BTreeSet<SectionKey>) -> Self {
        Self {
            role: role.to_string(),
            admin,
            sections,
        }
    }

    pub fn empty(role: &str) -> Self {
        Self::new(role, false, BTreeSet::new())
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Explicitly granted sections. Admins see everything regardless.
    pub fn sections(&self) -> Vec<SectionKey> {
        self.sections.iter().cloned().collect()
    }
}

impl SectionAccess for PermissionSet {
    fn can_view_section(&self, key: &str) -> bool {
        self.admin || self.sections.contains(key)
    }

    fn is_admin(&self) -> bool {
        self.admin
    }
}

/// Store lookup behind a session's permission fetch
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn role_assignment(&self, user_id: i64) -> Result<RoleAssignment, SqlError>;

    async fn role_table(&self) -> Result<RoleTable, SqlError>;
}

#[async_trait]
impl PermissionSource for SqlClientEnum {
    async fn role_assignment(&self, user_id: i64) -> Result<RoleAssignment, SqlError> {
        let user = self.get_user_by_id(user_id).await?;
        Ok(RoleAssignment {
            role: user.role,
            active: user.active,
        })
    }

    async fn role_table(&self) -> Result<RoleTable, SqlError> {
        let grants = self.get_role_grants().await?;
        Ok(RoleTable::from_grants(grants))
    }
}

/// Fetch the caller's role assignment and resolve it against the capability table
pub async fn load_permission_set<S: PermissionSource + ?Sized>(
    source: &S,
    table: &RoleTable,
    user_id: i64,
) -> Result<PermissionSet, SqlError> {
    let assignment = source.role_assignment(user_id).await?;
    Ok(table.resolve(&assignment))
}
