//! System control error types.

use thiserror::Error;

/// Errors from running external programs or reading host state.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("failed to launch {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with status {code:?}: {stderr}")]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} timed out after {timeout_secs}s")]
    Timeout { program: String, timeout_secs: u64 },

    #[error("{0} is not supported on this platform")]
    Unsupported(String),

    #[error("process {pid} not found")]
    ProcessNotFound { pid: u32 },

    #[error("no candidate command available")]
    NoCandidates,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias for system control results.
pub type SystemResult<T> = Result<T, SystemError>;
