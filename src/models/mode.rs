//! Externally visible application mode.

use serde::Serialize;

use super::Role;

/// Which kind of authenticated state the UI is in.
///
/// `DemoActive` and `BackendAuthenticated` never hold at once: a demo session
/// takes precedence, and the login surface clears it before any backend sign-in.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum AppMode {
    Unauthenticated,
    DemoActive { role: Role },
    /// The identity provider reports a session; the profile itself is fetched
    /// from the real backend by the caller.
    BackendAuthenticated,
}
