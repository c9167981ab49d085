//! Confirmation and notice messages for operations without a model to show.

use std::fmt;

/// Outcome line printed by the CLI, e.g. after a refused delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{prefix} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Recomputed topic t1".to_string());
        assert_eq!(success.to_string(), "Success: Recomputed topic t1\n");

        let failure = OperationStatus::failure("Refusing to delete without --confirm".to_string());
        assert!(failure.to_string().starts_with("Error:"));
    }
}
