use crate::menu::Menu;
use crate::prune::{prune_with_data, AssumeData, DataAvailability};
use enlace_error::error::NavError;
use enlace_types::{NavItem, RequiresDataPolicy, SectionAccess};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState<P> {
    Loading,
    Ready(P),
}

/// What the shell should draw for the navigation area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    Loading,
    Ready(Vec<NavItem>),
}

/// Per-session navigation gate.
///
/// Starts in `Loading` and moves to `Ready` exactly once, when the session's
/// permission set arrives. A failed fetch leaves the gate loading: it never
/// falls back to an empty or fully open menu.
#[derive(Debug, Clone)]
pub struct NavigationGate<P> {
    state: GateState<P>,
}

impl<P> Default for NavigationGate<P> {
    fn default() -> Self {
        Self {
            state: GateState::Loading,
        }
    }
}

impl<P: SectionAccess> NavigationGate<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState<P> {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, GateState::Ready(_))
    }

    pub fn permissions(&self) -> Option<&P> {
        match &self.state {
            GateState::Loading => None,
            GateState::Ready(permissions) => Some(permissions),
        }
    }

    /// Install the session's permission set. Only the first call succeeds.
    pub fn resolve(&mut self, permissions: P) -> Result<(), NavError> {
        if self.is_ready() {
            return Err(NavError::AlreadyResolved);
        }
        self.state = GateState::Ready(permissions);
        Ok(())
    }

    pub fn render(&self, menu: &Menu) -> GateView {
        self.render_with_data(menu, RequiresDataPolicy::Show, &AssumeData)
    }

    pub fn render_with_data<D: DataAvailability>(
        &self,
        menu: &Menu,
        policy: RequiresDataPolicy,
        data: &D,
    ) -> GateView {
        match &self.state {
            GateState::Loading => GateView::Loading,
            GateState::Ready(permissions) => {
                GateView::Ready(prune_with_data(menu.nodes(), permissions, policy, data))
            }
        }
    }
}
