//! Synthetic ids standing in for a collapsed cycle.

use causeway_core::constants::{SUPERNODE_PREFIX, SUPERNODE_SEPARATOR};

/// Id of the supernode replacing `members`, in path order.
pub fn encode(members: &[String]) -> String {
    format!("{SUPERNODE_PREFIX}{}", members.join(SUPERNODE_SEPARATOR))
}

pub fn is_supernode(id: &str) -> bool {
    id.starts_with(SUPERNODE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_in_path_order() {
        let members = vec!["b".to_string(), "a".to_string()];
        assert_eq!(encode(&members), "@cycle:b,a");
        assert!(is_supernode(&encode(&members)));
        assert!(!is_supernode("b"));
    }
}
