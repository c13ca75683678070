use chrono::Utc;
use enlace_auth::permission::{load_permission_set, PermissionSet, PermissionSource, RoleTable};
use enlace_auth::schema::SessionContext;
use enlace_nav::gate::{GateView, NavigationGate};
use enlace_nav::menu::Menu;
use enlace_nav::prune::DataAvailability;
use enlace_types::RequiresDataPolicy;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, error};

#[derive(Debug)]
struct SessionEntry {
    user_id: i64,
    /// token expiry, unix seconds
    expires_at: i64,
    gate: NavigationGate<PermissionSet>,
}

impl SessionEntry {
    fn new(session: &SessionContext) -> Self {
        Self {
            user_id: session.user_id,
            expires_at: session.expires_at,
            gate: NavigationGate::default(),
        }
    }
}

/// Navigation gates keyed by session id.
///
/// A session's gate is created on its first authenticated request and
/// resolved once its permission set has been fetched. Until then every
/// lookup reports the session as loading.
///
/// Entries are kept until their token expires. Expired gates and ended ids
/// are dropped whenever the registry is written to, since an expired token
/// is refused before it reaches the registry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    gates: RwLock<HashMap<String, SessionEntry>>,
    // session id -> token expiry
    ended: RwLock<HashMap<String, i64>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permission set of the session, fetching it if the gate is still loading.
    ///
    /// Returns `None` when the fetch fails. The gate stays loading and the
    /// next call tries again.
    pub async fn permissions<S: PermissionSource + ?Sized>(
        &self,
        session: &SessionContext,
        source: &S,
        table: &RoleTable,
    ) -> Option<PermissionSet> {
        if let Some(permissions) = self.resolved(&session.session_id).await {
            return Some(permissions);
        }

        let fetched = load_permission_set(source, table, session.user_id).await;

        let mut gates = self.gates.write().await;

        // the session may have been ended while the fetch was in flight
        if self.ended.read().await.contains_key(&session.session_id) {
            return None;
        }

        let now = Utc::now().timestamp();
        gates.retain(|_, entry| entry.expires_at > now);

        let entry = gates
            .entry(session.session_id.clone())
            .or_insert_with(|| SessionEntry::new(session));

        match fetched {
            Ok(permissions) => {
                // a concurrent request may have resolved the gate first
                if let Err(e) = entry.gate.resolve(permissions) {
                    debug!("Session {}: {}", session.session_id, e);
                }
                entry.gate.permissions().cloned()
            }
            Err(e) => {
                error!(
                    "Failed to fetch permissions for user {}: {}",
                    session.user_id, e
                );
                None
            }
        }
    }

    async fn resolved(&self, session_id: &str) -> Option<PermissionSet> {
        self.gates
            .read()
            .await
            .get(session_id)
            .and_then(|entry| entry.gate.permissions().cloned())
    }

    /// Render the session's navigation. Unknown sessions render as loading.
    pub async fn render<D: DataAvailability>(
        &self,
        session_id: &str,
        menu: &Menu,
        policy: RequiresDataPolicy,
        data: &D,
    ) -> GateView {
        match self.gates.read().await.get(session_id) {
            Some(entry) => entry.gate.render_with_data(menu, policy, data),
            None => GateView::Loading,
        }
    }

    /// Drop the session's gate and refuse its token until it expires
    pub async fn end(&self, session: &SessionContext) {
        let mut gates = self.gates.write().await;
        gates.remove(&session.session_id);

        let mut ended = self.ended.write().await;
        let now = Utc::now().timestamp();
        ended.retain(|_, expires_at| *expires_at > now);
        ended.insert(session.session_id.clone(), session.expires_at);
    }

    /// End every tracked session of a user. Returns how many were ended.
    ///
    /// Sessions that never reached the registry resolve their permissions
    /// from the store on their next request.
    pub async fn end_user_sessions(&self, user_id: i64) -> usize {
        let mut gates = self.gates.write().await;
        let session_ids: Vec<String> = gates
            .iter()
            .filter(|(_, entry)| entry.user_id == user_id)
            .map(|(session_id, _)| session_id.clone())
            .collect();

        let mut ended = self.ended.write().await;
        let now = Utc::now().timestamp();
        ended.retain(|_, expires_at| *expires_at > now);

        for session_id in &session_ids {
            if let Some(entry) = gates.remove(session_id) {
                ended.insert(session_id.clone(), entry.expires_at);
            }
        }

        session_ids.len()
    }

    pub async fn is_ended(&self, session_id: &str) -> bool {
        self.ended.read().await.contains_key(session_id)
    }

    pub async fn active_sessions(&self) -> usize {
        self.gates.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use enlace_auth::schema::RoleAssignment;
    use enlace_error::error::SqlError;
    use enlace_nav::prune::AssumeData;
    use enlace_sql::schemas::schema::RoleGrant;
    use enlace_types::{SectionAccess, PIMCO_COMUNIDADES, VOLUNTARIOS};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FlakySource {
        available: AtomicBool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PermissionSource for FlakySource {
        async fn role_assignment(&self, _user_id: i64) -> Result<RoleAssignment, SqlError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.available.load(Ordering::SeqCst) {
                Ok(RoleAssignment {
                    role: "volunteer".to_string(),
                    active: true,
                })
            } else {
                Err(SqlError::ConnectionError("pool closed".to_string()))
            }
        }

        async fn role_table(&self) -> Result<RoleTable, SqlError> {
            Ok(table())
        }
    }

    fn table() -> RoleTable {
        RoleTable::from_grants(vec![RoleGrant {
            role: "volunteer".to_string(),
            is_admin: false,
            section_key: Some(PIMCO_COMUNIDADES.to_string()),
        }])
    }

    fn session_for(session_id: &str, user_id: i64, expires_at: i64) -> SessionContext {
        SessionContext {
            session_id: session_id.to_string(),
            user_id,
            username: "ana".to_string(),
            role: "volunteer".to_string(),
            expires_at,
        }
    }

    fn session() -> SessionContext {
        session_for("sid-1", 7, Utc::now().timestamp() + 3600)
    }

    fn source() -> FlakySource {
        FlakySource {
            available: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_stays_loading_then_retries() {
        let registry = SessionRegistry::new();
        let source = FlakySource {
            available: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        };
        let menu = Menu::default();

        assert!(registry
            .permissions(&session(), &source, &table())
            .await
            .is_none());
        assert_eq!(registry.active_sessions().await, 1);
        assert_eq!(
            registry
                .render("sid-1", &menu, RequiresDataPolicy::Show, &AssumeData)
                .await,
            GateView::Loading
        );

        source.available.store(true, Ordering::SeqCst);
        let permissions = registry
            .permissions(&session(), &source, &table())
            .await
            .unwrap();
        assert!(permissions.can_view_section(PIMCO_COMUNIDADES));
        assert!(!permissions.can_view_section(VOLUNTARIOS));

        // resolved sessions are served from the gate
        registry.permissions(&session(), &source, &table()).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_render_and_end_session() {
        let registry = SessionRegistry::new();
        let source = source();
        let menu = Menu::default();

        registry.permissions(&session(), &source, &table()).await;
        match registry
            .render("sid-1", &menu, RequiresDataPolicy::Show, &AssumeData)
            .await
        {
            GateView::Ready(items) => {
                assert_eq!(items.len(), 1);
                assert!(items[0].contains_section(PIMCO_COMUNIDADES));
            }
            GateView::Loading => panic!("expected a resolved gate"),
        }

        registry.end(&session()).await;
        assert!(registry.is_ended("sid-1").await);
        assert_eq!(registry.active_sessions().await, 0);
        assert_eq!(
            registry
                .render("sid-1", &menu, RequiresDataPolicy::Show, &AssumeData)
                .await,
            GateView::Loading
        );
    }

    #[tokio::test]
    async fn test_end_user_sessions() {
        let registry = SessionRegistry::new();
        let source = source();
        let expires_at = Utc::now().timestamp() + 3600;

        let first = session_for("sid-1", 7, expires_at);
        let second = session_for("sid-2", 7, expires_at);
        let other = session_for("sid-3", 8, expires_at);
        for session in [&first, &second, &other] {
            registry.permissions(session, &source, &table()).await;
        }

        assert_eq!(registry.end_user_sessions(7).await, 2);
        assert!(registry.is_ended("sid-1").await);
        assert!(registry.is_ended("sid-2").await);
        assert!(!registry.is_ended("sid-3").await);
        assert_eq!(registry.active_sessions().await, 1);

        // an ended session does not get its gate back
        assert!(registry
            .permissions(&first, &source, &table())
            .await
            .is_none());
        assert_eq!(registry.active_sessions().await, 1);

        assert_eq!(registry.end_user_sessions(7).await, 0);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped() {
        let registry = SessionRegistry::new();
        let source = source();
        let now = Utc::now().timestamp();

        let expired = session_for("sid-old", 7, now - 60);
        let live = session_for("sid-new", 7, now + 3600);

        registry.permissions(&expired, &source, &table()).await;
        assert_eq!(registry.active_sessions().await, 1);

        registry.permissions(&live, &source, &table()).await;
        assert_eq!(registry.active_sessions().await, 1);
        assert_eq!(
            registry
                .render("sid-old", &Menu::default(), RequiresDataPolicy::Show, &AssumeData)
                .await,
            GateView::Loading
        );

        registry.end(&expired).await;
        assert!(registry.is_ended("sid-old").await);

        // ended ids are kept only until their token expires
        registry.end(&live).await;
        assert!(!registry.is_ended("sid-old").await);
        assert!(registry.is_ended("sid-new").await);
    }
}
