use chrono::{DateTime, Utc};

use super::id::Id;
use super::identity::Identity;

/// A counted entry in the vote ledger. At most one exists per
/// (poll, voter identity) pair; the storage layer enforces that atomically
/// with the insert.
#[derive(Clone, Debug)]
pub struct Vote {
    pub id: Id,
    pub poll_id: Id,
    pub option_id: Id,
    pub voter: Identity,
    pub created_at: DateTime<Utc>,
}

/// A vote as the admission engine hands it to the ledger. The store assigns
/// the id and timestamp on insert.
#[derive(Clone, Debug)]
pub struct NewVote {
    pub poll_id: Id,
    pub option_id: Id,
    pub voter: Identity,
}
