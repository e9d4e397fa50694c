/// Root-cause analysis errors.
#[derive(Debug, thiserror::Error)]
pub enum CausalError {
    #[error("graph inconsistency: {details}")]
    GraphInconsistency { details: String },

    #[error("unknown supernode: {id}")]
    UnknownSupernode { id: String },
}
