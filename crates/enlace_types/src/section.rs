use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub const PIMCO_COMUNIDADES: &str = "pimco-comunidades";
pub const PIMCO_BENEFICIARIOS: &str = "pimco-beneficiarios";
pub const PIMCO_ESTADISTICA: &str = "pimco-estadistica";
pub const ABRAZANDO_LEYENDAS: &str = "abrazando-leyendas";
pub const ORGANIZACIONES_LISTADO: &str = "organizaciones-listado";
pub const ORGANIZACIONES_FORMULARIOS: &str = "organizaciones-formularios";
pub const VOLUNTARIOS: &str = "voluntarios";
pub const ADMIN_USUARIOS: &str = "admin-usuarios";

/// Role given to the bootstrap administrator
pub const ADMIN_ROLE: &str = "admin";

/// Stable identifier of a navigable area of the console.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionKey(String);

impl SectionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SectionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SectionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for SectionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Read-only view of what the current session may see.
///
/// This is the only interface the navigation gate and the route guards use;
/// nothing outside the capability table looks at role names.
pub trait SectionAccess {
    fn can_view_section(&self, key: &str) -> bool;

    fn is_admin(&self) -> bool;
}

impl<T: SectionAccess + ?Sized> SectionAccess for &T {
    fn can_view_section(&self, key: &str) -> bool {
        (**self).can_view_section(key)
    }

    fn is_admin(&self) -> bool {
        (**self).is_admin()
    }
}

impl SectionAccess for HashSet<SectionKey> {
    fn can_view_section(&self, key: &str) -> bool {
        self.contains(key)
    }

    fn is_admin(&self) -> bool {
        false
    }
}

impl SectionAccess for BTreeSet<SectionKey> {
    fn can_view_section(&self, key: &str) -> bool {
        self.contains(key)
    }

    fn is_admin(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_key_lookup_by_str() {
        let keys: HashSet<SectionKey> = [PIMCO_COMUNIDADES, VOLUNTARIOS]
            .into_iter()
            .map(SectionKey::from)
            .collect();

        assert!(keys.can_view_section(PIMCO_COMUNIDADES));
        assert!(!keys.can_view_section(ADMIN_USUARIOS));
        assert!(!keys.is_admin());
    }

    #[test]
    fn test_section_key_serializes_as_string() {
        let key = SectionKey::new(PIMCO_ESTADISTICA);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"pimco-estadistica\"");

        let back: SectionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
