//! # Load Status
//!
//! Lifecycle of the remote catalog fetch.
//!
//! ```text
//! NotStarted → Loading → Loaded
//!                  ↑   ↘ Failed
//!                  └── (new refresh from Loaded/Failed)
//! ```

use serde::{Deserialize, Serialize};

/// Where the catalog fetch currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing fetched yet this session and nothing usable persisted
    #[default]
    NotStarted,
    /// A fetch is in flight
    Loading,
    /// Last fetch succeeded, or state was rehydrated from storage
    Loaded,
    /// Last fetch failed; items are whatever was there before
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }

    /// Enter `Loading`; `false` if a fetch is already in flight
    pub fn begin(&mut self) -> bool {
        if *self == Self::Loading {
            return false;
        }
        *self = Self::Loading;
        true
    }

    /// Finish the in-flight fetch successfully
    pub fn succeed(&mut self) {
        *self = Self::Loaded;
    }

    /// Finish the in-flight fetch with a failure
    pub fn fail(&mut self) {
        *self = Self::Failed;
    }
}
