//! Whether mutations against the real backend are allowed right now.

use serde::Serialize;

use crate::session::SessionStore;

const DISABLED_REASON: &str = "Changes are disabled while you are exploring the demo.";
const DISABLED_TOOLTIP: &str = "Sign in with a real account to make changes.";

/// True while a demo session is active. Recomputed from storage on every call.
pub async fn should_disable_mutations(sessions: &SessionStore) -> bool {
    sessions.is_active().await
}

pub fn demo_disabled_reason() -> &'static str {
    DISABLED_REASON
}

pub fn demo_disabled_tooltip() -> &'static str {
    DISABLED_TOOLTIP
}

/// Current guard decision with the text the UI shows for it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuardStatus {
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<&'static str>,
}

pub async fn guard_status(sessions: &SessionStore) -> GuardStatus {
    if should_disable_mutations(sessions).await {
        GuardStatus {
            disabled: true,
            reason: Some(demo_disabled_reason()),
            tooltip: Some(demo_disabled_tooltip()),
        }
    } else {
        GuardStatus {
            disabled: false,
            reason: None,
            tooltip: None,
        }
    }
}
