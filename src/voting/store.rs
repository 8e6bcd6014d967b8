use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::error::{InsertError, StoreError};

use super::id::{Id, ShareToken};
use super::identity::Identity;
use super::poll::{Poll, Visibility};
use super::vote::{NewVote, Vote};

/// Read access to polls and their options.
pub trait PollStore {
    fn poll_by_id(&mut self, poll_id: Id) -> Result<Option<Poll>, StoreError>;

    /// The poll an option belongs to, or None for an unknown option.
    fn poll_by_option(&mut self, option_id: Id) -> Result<Option<Poll>, StoreError>;

    fn poll_by_share_token(&mut self, token: ShareToken) -> Result<Option<Poll>, StoreError>;

    /// Candidate polls for the listing endpoint. May over-approximate for
    /// authenticated callers; `visibility::visible_polls` applies the final
    /// filter. Anonymous callers get active public polls only.
    fn polls_for(&mut self, identity: &Identity) -> Result<Vec<Poll>, StoreError>;
}

/// The vote ledger. Uniqueness of (poll, voter identity) is a property of
/// the store itself: `insert_vote` checks and writes atomically, so the
/// ledger stays correct when several service instances race on it.
pub trait VoteLedger {
    fn has_vote(&mut self, poll_id: Id, voter: &Identity) -> Result<bool, StoreError>;

    /// Append a counted vote. Fails with `InsertError::UniqueViolation` when
    /// the voter already has a vote on the poll.
    fn insert_vote(&mut self, vote: &NewVote) -> Result<Vote, InsertError>;

    fn find_vote(&mut self, poll_id: Id, voter: &Identity) -> Result<Option<Vote>, StoreError>;

    /// Point the voter's existing vote at a different option, keeping its
    /// identity and timestamp. None when no vote exists to move.
    fn reassign_vote(
        &mut self,
        poll_id: Id,
        voter: &Identity,
        option_id: Id,
    ) -> Result<Option<Vote>, StoreError>;

    fn count_by_option(&mut self, option_id: Id) -> Result<i64, StoreError>;

    fn count_by_poll(&mut self, poll_id: Id) -> Result<i64, StoreError>;
}

/// In-memory store with the same contract as the Postgres one. Cloned
/// handles share state through a mutex, which stands in for several
/// stateless service instances pointed at one database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    polls: Vec<Poll>,
    votes: Vec<Vote>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn add_poll(&self, poll: Poll) -> Result<(), StoreError> {
        self.lock()?.polls.push(poll);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::new("in-memory store mutex poisoned"))
    }
}

impl PollStore for MemoryStore {
    fn poll_by_id(&mut self, poll_id: Id) -> Result<Option<Poll>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.polls.iter().find(|poll| poll.id == poll_id).cloned())
    }

    fn poll_by_option(&mut self, option_id: Id) -> Result<Option<Poll>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .polls
            .iter()
            .find(|poll| poll.has_option(option_id))
            .cloned())
    }

    fn poll_by_share_token(&mut self, token: ShareToken) -> Result<Option<Poll>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .polls
            .iter()
            .find(|poll| poll.share_token == token)
            .cloned())
    }

    fn polls_for(&mut self, identity: &Identity) -> Result<Vec<Poll>, StoreError> {
        let inner = self.lock()?;
        let polls = match identity.user_id() {
            Some(user_id) => inner
                .polls
                .iter()
                .filter(|poll| {
                    poll.visibility == Visibility::Public
                        || poll.owner_id == user_id
                        || poll.allowed_users.contains(&user_id)
                })
                .cloned()
                .collect(),
            None => inner
                .polls
                .iter()
                .filter(|poll| poll.visibility == Visibility::Public && poll.is_active)
                .cloned()
                .collect(),
        };
        Ok(polls)
    }
}

impl VoteLedger for MemoryStore {
    fn has_vote(&mut self, poll_id: Id, voter: &Identity) -> Result<bool, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .votes
            .iter()
            .any(|vote| vote.poll_id == poll_id && vote.voter == *voter))
    }

    fn insert_vote(&mut self, vote: &NewVote) -> Result<Vote, InsertError> {
        // Check and append under one guard, like the database evaluates its
        // unique index atomically with the insert.
        let mut inner = self.lock()?;
        let duplicate = inner
            .votes
            .iter()
            .any(|existing| existing.poll_id == vote.poll_id && existing.voter == vote.voter);
        if duplicate {
            return Err(InsertError::UniqueViolation);
        }
        let recorded = Vote {
            id: Id::new(),
            poll_id: vote.poll_id,
            option_id: vote.option_id,
            voter: vote.voter.clone(),
            created_at: Utc::now(),
        };
        inner.votes.push(recorded.clone());
        Ok(recorded)
    }

    fn find_vote(&mut self, poll_id: Id, voter: &Identity) -> Result<Option<Vote>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .votes
            .iter()
            .find(|vote| vote.poll_id == poll_id && vote.voter == *voter)
            .cloned())
    }

    fn reassign_vote(
        &mut self,
        poll_id: Id,
        voter: &Identity,
        option_id: Id,
    ) -> Result<Option<Vote>, StoreError> {
        let mut inner = self.lock()?;
        let vote = inner
            .votes
            .iter_mut()
            .find(|vote| vote.poll_id == poll_id && vote.voter == *voter);
        Ok(vote.map(|vote| {
            vote.option_id = option_id;
            vote.clone()
        }))
    }

    fn count_by_option(&mut self, option_id: Id) -> Result<i64, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .votes
            .iter()
            .filter(|vote| vote.option_id == option_id)
            .count() as i64)
    }

    fn count_by_poll(&mut self, poll_id: Id) -> Result<i64, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .votes
            .iter()
            .filter(|vote| vote.poll_id == poll_id)
            .count() as i64)
    }
}
