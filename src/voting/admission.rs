use tracing::{debug, info};

use crate::error::{InsertError, StoreError, VoteError};

use super::id::Id;
use super::identity::Identity;
use super::poll::Poll;
use super::store::{PollStore, VoteLedger};
use super::visibility::can_view;
use super::vote::{NewVote, Vote};

/// Outcome of an accepted vote operation.
#[derive(Clone, Debug)]
pub enum VoteOutcome {
    /// A new ledger entry was written.
    Created(Vote),
    /// An existing entry was moved to a different option.
    Changed(Vote),
}

impl VoteOutcome {
    pub fn vote(&self) -> &Vote {
        match self {
            VoteOutcome::Created(vote) | VoteOutcome::Changed(vote) => vote,
        }
    }
}

/// Run the admission gates shared by casting and changing a vote. Each gate
/// short-circuits; rejections write nothing. Activity and expiry are checked
/// before visibility, so a closed poll answers the same way no matter who
/// asks.
fn admit<S: PollStore>(
    store: &mut S,
    poll_id: Id,
    option_id: Id,
    identity: &Identity,
) -> Result<Poll, VoteError> {
    let poll = store.poll_by_option(option_id)?.ok_or(VoteError::NotFound)?;
    if poll.id != poll_id {
        // The option exists but belongs to some other poll than the one
        // addressed; from the caller's point of view there is nothing there.
        return Err(VoteError::NotFound);
    }
    if !poll.is_active {
        return Err(VoteError::PollInactive);
    }
    if poll.is_expired() {
        return Err(VoteError::PollExpired);
    }
    if !can_view(&poll, identity) {
        return Err(VoteError::AccessDenied);
    }
    if identity.is_guest() && !poll.allow_guest_votes {
        return Err(VoteError::GuestVotingDisabled);
    }
    Ok(poll)
}

/// Cast a vote. A voter who already has a vote on the poll is rejected with
/// `AlreadyVoted`; changing an existing vote is `change_vote`, never a side
/// effect of casting.
///
/// The `has_vote` pre-check only answers the common case early. The
/// authoritative duplicate guard is the ledger insert itself: when two
/// submissions race, the storage uniqueness constraint admits one and the
/// loser's unique violation is translated to `AlreadyVoted`.
pub fn submit_vote<S>(
    store: &mut S,
    poll_id: Id,
    option_id: Id,
    identity: &Identity,
) -> Result<VoteOutcome, VoteError>
where
    S: PollStore + VoteLedger,
{
    let poll = admit(store, poll_id, option_id, identity)?;
    if store.has_vote(poll.id, identity)? {
        return Err(VoteError::AlreadyVoted);
    }
    let inserted = store.insert_vote(&NewVote {
        poll_id: poll.id,
        option_id,
        voter: identity.clone(),
    });
    match inserted {
        Ok(vote) => {
            info!(poll = %poll.id, option = %option_id, voter = %identity, "vote admitted");
            Ok(VoteOutcome::Created(vote))
        }
        Err(InsertError::UniqueViolation) => {
            debug!(poll = %poll.id, voter = %identity, "insert lost a duplicate race");
            Err(VoteError::AlreadyVoted)
        }
        Err(InsertError::Store(err)) => Err(VoteError::Store(err)),
    }
}

/// Change a vote, or cast one when none exists yet. Runs the same gates as
/// `submit_vote`; only the duplicate handling differs, so moving a vote never
/// changes the poll total.
pub fn change_vote<S>(
    store: &mut S,
    poll_id: Id,
    option_id: Id,
    identity: &Identity,
) -> Result<VoteOutcome, VoteError>
where
    S: PollStore + VoteLedger,
{
    let poll = admit(store, poll_id, option_id, identity)?;
    if let Some(vote) = store.reassign_vote(poll.id, identity, option_id)? {
        info!(poll = %poll.id, option = %option_id, voter = %identity, "vote changed");
        return Ok(VoteOutcome::Changed(vote));
    }
    let inserted = store.insert_vote(&NewVote {
        poll_id: poll.id,
        option_id,
        voter: identity.clone(),
    });
    match inserted {
        Ok(vote) => {
            info!(poll = %poll.id, option = %option_id, voter = %identity, "vote admitted");
            Ok(VoteOutcome::Created(vote))
        }
        Err(InsertError::UniqueViolation) => {
            // Another instance inserted between our update and insert; the
            // row exists now, so a single retry of the update settles it.
            let vote = store
                .reassign_vote(poll.id, identity, option_id)?
                .ok_or_else(|| {
                    VoteError::Store(StoreError::new("vote disappeared after a unique violation"))
                })?;
            debug!(poll = %poll.id, voter = %identity, "change settled after losing an insert race");
            Ok(VoteOutcome::Changed(vote))
        }
        Err(InsertError::Store(err)) => Err(VoteError::Store(err)),
    }
}
