//! Security rules for security-validator
//!
//! Defines the ordered dangerous-command catalog and the user allowlist.

pub mod allowlist;
pub mod catalog;

use std::fmt;

/// Grouping of rules by the kind of damage they guard against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// sudo, su, doas and friends
    PrivilegeEscalation,

    /// Recursive, forced or wide-target deletion
    DestructiveFilesystem,

    /// Raw device writes, partitioning, filesystem creation
    DiskOperation,

    /// Shutdown, reboot, halt and service stops
    SystemControl,

    /// World-writable modes and ownership grabs
    Permissions,

    /// Killing init or force-killing by name
    ProcessKill,

    /// Writes, truncation or shredding of system paths
    SystemFiles,

    /// Fork bombs and unbounded writes
    ResourceExhaustion,

    /// Dangerous verbs hidden behind chaining, substitution or eval
    IndirectExecution,
}

impl Family {
    /// Stable kebab-case label used in listings
    pub fn label(self) -> &'static str {
        match self {
            Family::PrivilegeEscalation => "privilege-escalation",
            Family::DestructiveFilesystem => "destructive-filesystem",
            Family::DiskOperation => "disk-operation",
            Family::SystemControl => "system-control",
            Family::Permissions => "permissions",
            Family::ProcessKill => "process-kill",
            Family::SystemFiles => "system-files",
            Family::ResourceExhaustion => "resource-exhaustion",
            Family::IndirectExecution => "indirect-execution",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A security rule definition
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Family this rule belongs to
    pub family: Family,

    /// Regex pattern to match (compiled case-insensitively)
    pub pattern: &'static str,

    /// Human-readable reason for blocking
    pub reason: &'static str,
}

impl Rule {
    /// Create a new rule
    pub const fn new(
        id: &'static str,
        family: Family,
        pattern: &'static str,
        reason: &'static str,
    ) -> Self {
        Self {
            id,
            family,
            pattern,
            reason,
        }
    }
}
