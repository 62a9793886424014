//! Application mode transitions.
//!
//! ```text
//! Unauthenticated --demo sign-in--> DemoActive(role) --switch role--> DemoActive(role')
//!        ^                                 |
//!        +------exit / login surface-------+
//! Unauthenticated <--logout-- BackendAuthenticated
//! ```

use crate::data::{ExitPolicy, LocalDataStore};
use crate::models::AppMode;
use crate::session::SessionStore;

/// Resolve the current mode. `identity_session` is the identity provider's
/// report of a signed-in user; it only matters when no demo is running.
pub async fn resolve_mode(sessions: &SessionStore, identity_session: bool) -> AppMode {
    match sessions.get_session().await {
        Some(session) if session.active => AppMode::DemoActive { role: session.role },
        _ if identity_session => AppMode::BackendAuthenticated,
        _ => AppMode::Unauthenticated,
    }
}

/// The login surface always starts from a clean slate, so a demo session can
/// never coexist with a backend sign-in made from it.
pub async fn enter_login_surface(sessions: &SessionStore) {
    sessions.clear_session().await;
}

pub async fn exit_demo(sessions: &SessionStore, data: &LocalDataStore, policy: ExitPolicy) {
    sessions.clear_session().await;
    if policy == ExitPolicy::WipeData {
        data.clear_all().await;
    }
}
