//! Error type shared by every NitroPool read.

use alloy::primitives::Address;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while resolving pool configuration or scanning events.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// JSON-RPC transport failure.
    #[error("rpc: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    /// Dynamic contract call failure (encoding, revert, decoding).
    #[error("contract call: {0}")]
    Contract(#[from] alloy::contract::Error),

    /// Dynamic ABI decoding failure (log data or call output).
    #[error("abi decode: {0}")]
    Decode(#[from] alloy::dyn_abi::Error),

    /// The endpoint did not answer within the configured timeout.
    #[error("{op} timed out")]
    Timeout {
        /// Name of the read that timed out.
        op: &'static str,
    },

    /// No RPC endpoints were configured.
    #[error("no RPC endpoints configured")]
    NoEndpoints,

    /// An RPC URL could not be parsed.
    #[error("invalid RPC URL {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },

    /// The requested block is unknown to the endpoint.
    #[error("block {0} not found")]
    BlockNotFound(u64),

    /// The contract ABI has no function or event with this name.
    #[error("{contract} ABI has no {kind} `{name}`")]
    MissingAbiItem {
        /// Contract the ABI belongs to.
        contract: Address,
        /// `"function"` or `"event"`.
        kind: &'static str,
        /// Item name.
        name: String,
    },

    /// A call returned values of an unexpected shape.
    #[error("{call}: unexpected output ({detail})")]
    UnexpectedOutput {
        /// `Contract.function` label.
        call: String,
        /// What was wrong with it.
        detail: String,
    },

    /// The block explorer refused or failed the ABI request.
    #[error("explorer: failed to fetch ABI for {address}: {message}")]
    Explorer {
        /// Contract whose ABI was requested.
        address: Address,
        /// Explorer-provided message.
        message: String,
    },

    /// HTTP failure talking to the explorer.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure in an ABI directory.
    #[error("{path}: {source}")]
    Io {
        /// File or directory involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Token amount scaling failure.
    #[error("units: {0}")]
    Units(#[from] alloy::primitives::utils::UnitsError),

    /// Invalid scan parameters.
    #[error("invalid scan configuration: {0}")]
    InvalidScan(String),
}

impl Error {
    pub(crate) fn unexpected(call: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnexpectedOutput {
            call: call.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
