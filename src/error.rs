use std::error::Error as StdError;

use thiserror::Error;

/// Unclassified storage or infrastructure failure. Never interpreted by the
/// core beyond logging and surfacing as an internal error; a vote write is
/// never retried automatically.
#[derive(Debug, Error)]
#[error("storage failure: {0}")]
pub struct StoreError(pub Box<dyn StdError + Send + Sync>);

impl StoreError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> StoreError {
        StoreError(source.into())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> StoreError {
        StoreError(Box::new(err))
    }
}

impl From<diesel::result::ConnectionError> for StoreError {
    fn from(err: diesel::result::ConnectionError) -> StoreError {
        StoreError(Box::new(err))
    }
}

/// Ledger insert that lost to the storage-level uniqueness constraint, kept
/// separate from other failures so the admission engine can translate it
/// instead of reporting a server error.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("a vote for this voter and poll already exists")]
    UniqueViolation,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Rejection reasons for read access to a poll.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("poll not found")]
    NotFound,
    #[error("not authorized to view this poll")]
    AccessDenied,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Rejection reasons produced by the vote admission gates, in gate order.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("poll or option not found")]
    NotFound,
    #[error("poll is not active")]
    PollInactive,
    #[error("poll has expired")]
    PollExpired,
    #[error("not authorized to vote on this poll")]
    AccessDenied,
    #[error("guest voting is not allowed for this poll")]
    GuestVotingDisabled,
    #[error("you already voted on this poll")]
    AlreadyVoted,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures while resolving the caller to a voter identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid or unknown credentials")]
    BadCredentials,
    #[error("could not determine the request origin")]
    UnknownOrigin,
    #[error(transparent)]
    Store(#[from] StoreError),
}
