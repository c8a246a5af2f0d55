use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Uninitialized,
    Authenticating,
    ResolvingIdentity,
    Ready,
    Unauthenticated,
}

impl SessionState {
    // Holds an access token.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::ResolvingIdentity | SessionState::Ready)
    }

    fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Authenticating => "authenticating",
            SessionState::ResolvingIdentity => "resolving-identity",
            SessionState::Ready => "ready",
            SessionState::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Identity resolution runs at most once per token acquisition.
#[derive(Debug, Default)]
pub(crate) struct ResolutionGuard {
    resolving: bool,
    loaded: bool,
}

impl ResolutionGuard {
    // Return false when a resolution is in flight or already done.
    pub(crate) fn try_begin(&mut self) -> bool {
        if self.resolving || self.loaded {
            return false;
        }
        self.resolving = true;
        true
    }

    pub(crate) fn complete(&mut self) {
        self.resolving = false;
        self.loaded = true;
    }

    pub(crate) fn reset(&mut self) {
        self.resolving = false;
        self.loaded = false;
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.loaded
    }
}
