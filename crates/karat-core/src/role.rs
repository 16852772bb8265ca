//! Roles, production stages and job statuses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a console user.
///
/// `Owner` unlocks the management pages. Every other value, including role
/// strings this build does not know about, is treated as a worker role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Owner,
    Caster,
    Filer,
    Setter,
    Polisher,
    /// A role the server returned that is not one of the known values.
    Other(String),
}

impl Role {
    /// Roles offered when registering a new user.
    pub const ASSIGNABLE: [Role; 5] = [
        Role::Owner,
        Role::Caster,
        Role::Filer,
        Role::Setter,
        Role::Polisher,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Role::Owner => "owner",
            Role::Caster => "caster",
            Role::Filer => "filer",
            Role::Setter => "setter",
            Role::Polisher => "polisher",
            Role::Other(s) => s,
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &str {
        match self {
            Role::Owner => "Owner",
            Role::Caster => "Caster",
            Role::Filer => "Filer",
            Role::Setter => "Setter",
            Role::Polisher => "Polisher",
            Role::Other(s) => s,
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }

    pub fn is_worker(&self) -> bool {
        !self.is_owner()
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "owner" => Role::Owner,
            "caster" => Role::Caster,
            "filer" => Role::Filer,
            "setter" => Role::Setter,
            "polisher" => Role::Polisher,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequential production stage a job is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Casting,
    Filing,
    Setting,
    Polishing,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Casting, Stage::Filing, Stage::Setting, Stage::Polishing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Casting => "casting",
            Stage::Filing => "filing",
            Stage::Setting => "setting",
            Stage::Polishing => "polishing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Casting => "Casting",
            Stage::Filing => "Filing",
            Stage::Setting => "Setting",
            Stage::Polishing => "Polishing",
        }
    }
}

impl FromStr for Stage {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim())
            .ok_or_else(|| UnknownValue::new("stage", s))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job status values accepted by the jobs list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    PendingAssignment,
    InProgress,
    Completed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Created,
        JobStatus::PendingAssignment,
        JobStatus::InProgress,
        JobStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::PendingAssignment => "pending_assignment",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Created => "Created",
            JobStatus::PendingAssignment => "Pending Assignment",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
        }
    }
}

impl FromStr for JobStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownValue::new("job status", s))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that does not name a known stage or status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_round_trips_verbatim() {
        let role: Role = serde_json::from_str("\"engraver\"").unwrap();
        assert_eq!(role, Role::Other("engraver".to_string()));
        assert!(role.is_worker());
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"engraver\"");
    }

    #[test]
    fn test_only_owner_is_owner() {
        assert!(Role::Owner.is_owner());
        for role in [Role::Caster, Role::Filer, Role::Setter, Role::Polisher] {
            assert!(role.is_worker(), "{role} should be a worker role");
        }
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!("polishing".parse::<Stage>().unwrap(), Stage::Polishing);
        let err = "soldering".parse::<Stage>().unwrap_err();
        assert_eq!(err.to_string(), "unknown stage: 'soldering'");
    }

    #[test]
    fn test_job_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&JobStatus::PendingAssignment).unwrap(),
            "\"pending_assignment\""
        );
        assert_eq!("in_progress".parse::<JobStatus>().unwrap(), JobStatus::InProgress);
    }
}
