use crate::errors::CausewayResult;
use crate::models::ChangeMap;

/// Downstream consumer of committed change maps (alerting, UI push, ...).
pub trait IChangeSink: Send + Sync {
    fn notify(&self, changes: &ChangeMap) -> CausewayResult<()>;
}
