//! SQL for the component graph. Every function takes a plain `Connection`
//! so it runs the same inside a transaction, a snapshot, or on the writer.

pub mod call_ops;
pub mod chain_ops;
pub mod component_ops;
pub mod lock_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use causeway_core::errors::CausewayResult;
use causeway_core::models::ComponentStatus;

use crate::to_storage_err;

/// Timestamp format shared by every `*_at` column.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> CausewayResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse timestamp {raw:?}: {e}")))
}

pub(crate) fn parse_status(raw: &str) -> CausewayResult<ComponentStatus> {
    raw.parse()
        .map_err(|_| to_storage_err(format!("stored status {raw:?} is not a known status")))
}

/// Bind a list of ids as one JSON array parameter, consumed with `json_each`.
pub(crate) fn ids_param(ids: &[String]) -> CausewayResult<String> {
    serde_json::to_string(ids).map_err(|e| to_storage_err(e.to_string()))
}
