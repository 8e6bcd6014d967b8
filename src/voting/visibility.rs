use crate::error::{StoreError, ViewError};

use super::id::{Id, ShareToken};
use super::identity::Identity;
use super::poll::{Poll, Visibility};
use super::store::PollStore;

/// Single authority on whether an actor may see a poll. Every read path and
/// the vote admission gates call this; nothing else reimplements the rules.
pub fn can_view(poll: &Poll, identity: &Identity) -> bool {
    match poll.visibility {
        Visibility::Public => true,
        Visibility::Private => identity.user_id() == Some(poll.owner_id),
        Visibility::Restricted => match identity.user_id() {
            Some(user_id) => user_id == poll.owner_id || poll.allowed_users.contains(&user_id),
            None => false,
        },
    }
}

/// Load a poll by id, enforcing the visibility policy.
pub fn visible_poll<S: PollStore>(
    store: &mut S,
    poll_id: Id,
    identity: &Identity,
) -> Result<Poll, ViewError> {
    let poll = store.poll_by_id(poll_id)?.ok_or(ViewError::NotFound)?;
    if !can_view(&poll, identity) {
        return Err(ViewError::AccessDenied);
    }
    Ok(poll)
}

/// Load a poll through its share token. Knowing the token does not bypass
/// the visibility policy.
pub fn visible_poll_by_token<S: PollStore>(
    store: &mut S,
    token: ShareToken,
    identity: &Identity,
) -> Result<Poll, ViewError> {
    let poll = store.poll_by_share_token(token)?.ok_or(ViewError::NotFound)?;
    if !can_view(&poll, identity) {
        return Err(ViewError::AccessDenied);
    }
    Ok(poll)
}

/// Polls the caller may see, for the listing endpoint. The store narrows to
/// a candidate set; `can_view` remains the final filter so the policy cannot
/// drift between call sites.
pub fn visible_polls<S: PollStore>(
    store: &mut S,
    identity: &Identity,
) -> Result<Vec<Poll>, StoreError> {
    let mut polls = store.polls_for(identity)?;
    polls.retain(|poll| can_view(poll, identity));
    Ok(polls)
}
