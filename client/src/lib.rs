pub mod auth;
pub mod betting;
pub mod client;
pub mod poll;
pub mod storage;

pub use auth::AuthSession;
pub use betting::{AddReport, BettingFlow, PeriodView, SubmitReceipt};
pub use client::Client;
pub use poll::{ChatFeed, PollHandle};
pub use storage::{JsonFileStore, KeyValue, LocalStore, MemoryStore};
use thiserror::Error;

/// Error type for portal client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The backend rejected the request with an explanatory message; surfaced
    /// verbatim.
    #[error("{message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("session expired")]
    Unauthorized,
    #[error("period {0} not found")]
    PeriodNotFound(String),
    #[error("period id is not numeric: {0}")]
    InvalidPeriodId(String),
    #[error("cart is empty")]
    EmptyCart,
    #[error("every cart row needs a stake")]
    MissingStake,
    #[error("sale limit exceeded for: {}", numbers.join(", "))]
    SaleLimitExceeded { numbers: Vec<String> },
    #[error("invalid data: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type for portal client operations.
pub type Result<T> = std::result::Result<T, Error>;
