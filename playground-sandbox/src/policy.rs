use serde::{Deserialize, Serialize};

/// Capabilities granted to the embedding iframe (`sandbox` attribute).
///
/// No profile grants same-origin access, popups or top-level navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxProfile {
    /// Free-form playground: scripts only.
    #[default]
    Playground,
    /// Interview exercises: scripts plus alert/confirm/prompt dialogs.
    Interview,
}

impl SandboxProfile {
    pub fn attribute(self) -> &'static str {
        match self {
            SandboxProfile::Playground => "allow-scripts",
            SandboxProfile::Interview => "allow-scripts allow-modals",
        }
    }

    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        self.attribute().split_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_never_grant_host_access() {
        for profile in [SandboxProfile::Playground, SandboxProfile::Interview] {
            let tokens: Vec<_> = profile.tokens().collect();
            assert!(tokens.contains(&"allow-scripts"));
            for forbidden in ["allow-same-origin", "allow-top-navigation", "allow-popups"] {
                assert!(!tokens.contains(&forbidden), "{:?} grants {}", profile, forbidden);
            }
        }
    }

    #[test]
    fn test_interview_allows_modals() {
        assert_eq!(SandboxProfile::Interview.attribute(), "allow-scripts allow-modals");
    }
}
