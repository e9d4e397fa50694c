//! Component model: status categories, persisted state, snapshots, and calls.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CausewayError;

/// Health classification of a monitored component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentStatus {
    /// Newly observed, still inside its grace period.
    Initializing,
    Normal,
    /// Abnormal, not yet attributed.
    Confirmed,
    /// Abnormal because of a downstream perpetrator.
    Victim,
    /// Abnormal root cause.
    Perpetrator,
}

impl ComponentStatus {
    /// All statuses, in declaration order.
    pub const ALL: [ComponentStatus; 5] = [
        ComponentStatus::Initializing,
        ComponentStatus::Normal,
        ComponentStatus::Confirmed,
        ComponentStatus::Victim,
        ComponentStatus::Perpetrator,
    ];

    /// Statuses that count as abnormal.
    pub const ANOMALOUS: [ComponentStatus; 3] = [
        ComponentStatus::Confirmed,
        ComponentStatus::Victim,
        ComponentStatus::Perpetrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Initializing => "INITIALIZING",
            ComponentStatus::Normal => "NORMAL",
            ComponentStatus::Confirmed => "CONFIRMED",
            ComponentStatus::Victim => "VICTIM",
            ComponentStatus::Perpetrator => "PERPETRATOR",
        }
    }

    pub fn is_anomalous(&self) -> bool {
        Self::ANOMALOUS.contains(self)
    }

    /// `INITIALIZING` counts as normal.
    pub fn is_normal(&self) -> bool {
        !self.is_anomalous()
    }

    /// Whether moving from `self` to `other` crosses the normal/abnormal line.
    pub fn changes_category(&self, other: ComponentStatus) -> bool {
        self.is_normal() != other.is_normal()
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentStatus {
    type Err = CausewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CausewayError::InvalidStatus {
                status: s.to_string(),
            })
    }
}

/// The mutable part of a component as the state machine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentState {
    pub status: ComponentStatus,
    pub transition_counter: u32,
    /// Direct callee ids, sorted.
    pub dependencies: Vec<String>,
}

/// Point-in-time snapshot of one component, as returned by `search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub status: ComponentStatus,
    pub transition_counter: u32,
    pub dependencies: Vec<String>,
    pub consumers: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Component {
    pub fn is_consumed_by(&self, id: &str) -> bool {
        self.consumers.iter().any(|c| c == id)
    }
}

/// One observed call. A call without a caller only registers the callee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    pub callee: String,
}

impl ComponentCall {
    pub fn new(caller: impl Into<String>, callee: impl Into<String>) -> Self {
        Self {
            caller: Some(caller.into()),
            callee: callee.into(),
        }
    }

    pub fn callee_only(callee: impl Into<String>) -> Self {
        Self {
            caller: None,
            callee: callee.into(),
        }
    }
}

/// A `CALLS` edge with its cached view of the callee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller_id: String,
    pub callee_id: String,
    pub callee_status: ComponentStatus,
    pub callee_is_abnormal: bool,
}
