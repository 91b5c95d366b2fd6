use crate::error::SnipeError;
use crate::types::BlockHeight;

/// Terminal result of a run, returned to the binary instead of exiting
/// in place so the core stays testable without spawning a process.
#[derive(Debug)]
pub enum RunOutcome {
    /// The registration finalized. The block number is best-effort: `None`
    /// means the hash could not be resolved, which degrades the report but
    /// not the outcome.
    Registered { block: Option<BlockHeight> },
    /// A fatal error ended the run before finalization.
    Failed { error: SnipeError },
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Registered { .. } => 0,
            RunOutcome::Failed { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(RunOutcome::Registered { block: Some(1) }.exit_code(), 0);
        assert_eq!(RunOutcome::Registered { block: None }.exit_code(), 0);
        let failed = RunOutcome::Failed {
            error: SnipeError::Submission("x".into()),
        };
        assert_eq!(failed.exit_code(), 1);
    }
}
