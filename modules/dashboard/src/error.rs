use thiserror::Error;

/// Why a flow did not succeed. Flows log these at their boundary; callers
/// only inspect them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The call itself failed: network, bad URL, or a non-JSON body.
    #[error("{message}")]
    Transport { message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },
}

impl FlowError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            detail: detail.into(),
        }
    }
}
