use causeway_core::models::{Change, ChangeMap, ComponentStatus};

/// Accumulates the status writes of one update. Repeated writes to the same
/// id keep the first `from` and the last `to`.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: ChangeMap,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: &str, from: ComponentStatus, to: ComponentStatus) {
        self.changes
            .entry(id.to_string())
            .and_modify(|change| change.to.status = to)
            .or_insert_with(|| Change::new(id, from, to));
    }

    /// The merged changes, minus those that net out to nothing.
    pub fn into_map(mut self) -> ChangeMap {
        self.changes.retain(|_, change| !change.is_noop());
        self.changes
    }
}
