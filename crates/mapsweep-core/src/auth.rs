//! Permission collaborator
//!
//! The pipeline treats authorization as a black box: ask whether a
//! principal holds a capability, get back allow/deny plus a reason.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Capabilities the reconciliation pipeline asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// Inspect catalog matches without deleting
    #[serde(rename = "maps:read")]
    ReadMaps,
    /// Delete catalog records
    #[serde(rename = "maps:delete")]
    DeleteMaps,
}

impl Capability {
    /// Denial reason shown to the caller
    #[must_use]
    pub const fn denial_reason(self) -> &'static str {
        match self {
            Self::ReadMaps => "You do not have permission to view maps",
            Self::DeleteMaps => "You do not have permission to delete maps",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadMaps => "maps:read",
            Self::DeleteMaps => "maps:delete",
        })
    }
}

/// Outcome of a permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Human-readable reason, set on denial
    pub reason: Option<String>,
}

impl AccessDecision {
    /// Allow the request
    #[inline]
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// Deny the request with a reason
    #[inline]
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Authorization collaborator
#[async_trait::async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Decide whether `principal` holds `capability`; `None` is anonymous
    async fn check(&self, principal: Option<&str>, capability: Capability) -> AccessDecision;
}

/// Permission table loaded from configuration
///
/// `maps:delete` implies `maps:read`. Anonymous callers hold nothing.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    grants: BTreeMap<String, BTreeSet<Capability>>,
}

impl StaticPermissions {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a principal → capabilities map
    #[must_use]
    pub fn from_grants(grants: &BTreeMap<String, Vec<Capability>>) -> Self {
        Self {
            grants: grants
                .iter()
                .map(|(principal, caps)| (principal.clone(), caps.iter().copied().collect()))
                .collect(),
        }
    }

    /// Grant a capability to a principal
    #[must_use]
    pub fn grant(mut self, principal: impl Into<String>, capability: Capability) -> Self {
        self.grants.entry(principal.into()).or_default().insert(capability);
        self
    }

    fn holds(&self, principal: &str, capability: Capability) -> bool {
        self.grants.get(principal).is_some_and(|caps| {
            caps.contains(&capability)
                || (capability == Capability::ReadMaps && caps.contains(&Capability::DeleteMaps))
        })
    }
}

#[async_trait::async_trait]
impl PermissionChecker for StaticPermissions {
    async fn check(&self, principal: Option<&str>, capability: Capability) -> AccessDecision {
        match principal {
            Some(who) if self.holds(who, capability) => AccessDecision::allow(),
            _ => AccessDecision::deny(capability.denial_reason()),
        }
    }
}

/// Checker that allows everything; for local CLI runs against a file the
/// operator already controls
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait::async_trait]
impl PermissionChecker for AllowAll {
    async fn check(&self, _principal: Option<&str>, _capability: Capability) -> AccessDecision {
        AccessDecision::allow()
    }
}
