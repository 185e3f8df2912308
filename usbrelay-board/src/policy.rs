//! What a board does when the transport fails

use serde::{Deserialize, Serialize};

/// Failure handling for relay operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Return transport failures as errors
    #[default]
    Strict,
    /// Log transport failures and carry on: queries report every relay
    /// off, writes report success. Matches older relay tools.
    DefaultOnError,
}

impl FailurePolicy {
    /// Whether failures are absorbed instead of returned
    pub fn absorbs_errors(&self) -> bool {
        matches!(self, Self::DefaultOnError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Strict);
        assert!(!FailurePolicy::Strict.absorbs_errors());
        assert!(FailurePolicy::DefaultOnError.absorbs_errors());
    }
}
