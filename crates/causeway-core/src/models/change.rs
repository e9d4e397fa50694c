//! Change records returned by a status update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ComponentStatus;

/// `{status}` half of a change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: ComponentStatus,
}

/// `{id, from: {status}, to: {status}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub id: String,
    pub from: StatusSnapshot,
    pub to: StatusSnapshot,
}

impl Change {
    pub fn new(id: impl Into<String>, from: ComponentStatus, to: ComponentStatus) -> Self {
        Self {
            id: id.into(),
            from: StatusSnapshot { status: from },
            to: StatusSnapshot { status: to },
        }
    }

    /// True when the record nets out to nothing.
    pub fn is_noop(&self) -> bool {
        self.from.status == self.to.status
    }
}

/// Changes of one update, keyed by component id.
pub type ChangeMap = BTreeMap<String, Change>;
