//! Lifecycle states reported by the provider
//!
//! These states are observed, never owned: the provider drives all
//! transitions, this tool only reads them back while polling. Values the
//! provider adds that this tool does not model land in [`LifecycleState::Other`]
//! rather than failing the poll.

use serde::{Deserialize, Serialize};

/// Provider-reported status of a file system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Creating,
    Available,
    Updating,
    Deleting,
    Failed,
    Misconfigured,
    /// Any state this tool does not model, carried through verbatim.
    Other(String),
}

impl LifecycleState {
    /// Parse the provider's string form.
    pub fn parse(value: &str) -> Self {
        match value {
            "CREATING" => LifecycleState::Creating,
            "AVAILABLE" => LifecycleState::Available,
            "UPDATING" => LifecycleState::Updating,
            "DELETING" => LifecycleState::Deleting,
            "FAILED" => LifecycleState::Failed,
            "MISCONFIGURED" => LifecycleState::Misconfigured,
            other => LifecycleState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::Creating => "CREATING",
            LifecycleState::Available => "AVAILABLE",
            LifecycleState::Updating => "UPDATING",
            LifecycleState::Deleting => "DELETING",
            LifecycleState::Failed => "FAILED",
            LifecycleState::Misconfigured => "MISCONFIGURED",
            LifecycleState::Other(value) => value,
        }
    }

    /// Whether a create operation stops polling at this state.
    ///
    /// FAILED and MISCONFIGURED are terminal too: the poll loop exits on any
    /// of the three and the caller decides what the outcome means.
    pub fn is_create_terminal(&self) -> bool {
        matches!(
            self,
            LifecycleState::Available | LifecycleState::Failed | LifecycleState::Misconfigured
        )
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_states() {
        assert_eq!(LifecycleState::parse("CREATING"), LifecycleState::Creating);
        assert_eq!(LifecycleState::parse("AVAILABLE"), LifecycleState::Available);
        assert_eq!(LifecycleState::parse("DELETING"), LifecycleState::Deleting);
    }

    #[test]
    fn unknown_states_are_carried_through() {
        let state = LifecycleState::parse("MISCONFIGURED_UNAVAILABLE");
        assert_eq!(
            state,
            LifecycleState::Other("MISCONFIGURED_UNAVAILABLE".to_string())
        );
        assert_eq!(state.as_str(), "MISCONFIGURED_UNAVAILABLE");
        assert!(!state.is_create_terminal());
    }

    #[test]
    fn create_terminal_set() {
        assert!(LifecycleState::Available.is_create_terminal());
        assert!(LifecycleState::Failed.is_create_terminal());
        assert!(LifecycleState::Misconfigured.is_create_terminal());
        assert!(!LifecycleState::Creating.is_create_terminal());
        assert!(!LifecycleState::Updating.is_create_terminal());
        assert!(!LifecycleState::Deleting.is_create_terminal());
    }

    #[test]
    fn round_trips_as_str() {
        for value in ["CREATING", "AVAILABLE", "UPDATING", "DELETING", "FAILED", "MISCONFIGURED"] {
            assert_eq!(LifecycleState::parse(value).as_str(), value);
        }
    }
}
