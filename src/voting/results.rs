use serde::Serialize;

use crate::error::{StoreError, ViewError};

use super::id::Id;
use super::identity::Identity;
use super::poll::Poll;
use super::store::{PollStore, VoteLedger};
use super::visibility::visible_poll;

/// Tally for a single option.
#[derive(Clone, Debug, Serialize)]
pub struct OptionTally {
    pub id: Id,
    pub text: String,
    pub vote_count: i64,
}

/// Aggregated results for one poll, options in creation order. Computed on
/// demand from the ledger; nothing is cached.
#[derive(Clone, Debug, Serialize)]
pub struct PollResults {
    pub poll_id: Id,
    pub title: String,
    pub description: String,
    pub total_votes: i64,
    pub options: Vec<OptionTally>,
}

/// Count the ledger for a poll the caller is already allowed to see.
pub fn tally<S: VoteLedger>(store: &mut S, poll: &Poll) -> Result<PollResults, StoreError> {
    let mut options = Vec::with_capacity(poll.options.len());
    for option in &poll.options {
        options.push(OptionTally {
            id: option.id,
            text: option.text.clone(),
            vote_count: store.count_by_option(option.id)?,
        });
    }
    Ok(PollResults {
        poll_id: poll.id,
        title: poll.title.clone(),
        description: poll.description.clone(),
        total_votes: store.count_by_poll(poll.id)?,
        options,
    })
}

pub fn poll_results<S>(
    store: &mut S,
    poll_id: Id,
    identity: &Identity,
) -> Result<PollResults, ViewError>
where
    S: PollStore + VoteLedger,
{
    let poll = visible_poll(store, poll_id, identity)?;
    Ok(tally(store, &poll)?)
}

/// The caller's own vote on a poll, if any.
pub fn my_vote<S>(store: &mut S, poll_id: Id, identity: &Identity) -> Result<Option<Id>, ViewError>
where
    S: PollStore + VoteLedger,
{
    let poll = visible_poll(store, poll_id, identity)?;
    let vote = store.find_vote(poll.id, identity)?;
    Ok(vote.map(|vote| vote.option_id))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;

    use super::*;
    use crate::voting::admission::submit_vote;
    use crate::voting::id::ShareToken;
    use crate::voting::identity::GuestOrigin;
    use crate::voting::poll::{PollOption, Visibility};
    use crate::voting::store::MemoryStore;

    fn seed_poll(store: &MemoryStore, visibility: Visibility, owner_id: Id) -> Poll {
        let poll = Poll {
            id: Id::new(),
            title: String::from("Release name"),
            description: String::from("Pick one"),
            category: String::new(),
            owner_id,
            visibility,
            share_token: ShareToken::new(),
            is_active: true,
            allow_guest_votes: true,
            expires_at: None,
            created_at: Utc::now(),
            options: vec![
                PollOption {
                    id: Id::new(),
                    text: String::from("Aardvark"),
                },
                PollOption {
                    id: Id::new(),
                    text: String::from("Bandicoot"),
                },
                PollOption {
                    id: Id::new(),
                    text: String::from("Capuchin"),
                },
            ],
            allowed_users: HashSet::new(),
        };
        store.add_poll(poll.clone()).unwrap();
        poll
    }

    fn guest(origin: &str) -> Identity {
        Identity::Guest(GuestOrigin::from(String::from(origin)))
    }

    #[test]
    fn counts_follow_option_order() {
        let mut store = MemoryStore::new();
        let poll = seed_poll(&store, Visibility::Public, Id::new());

        submit_vote(&mut store, poll.id, poll.options[1].id, &guest("10.0.0.1")).unwrap();
        submit_vote(&mut store, poll.id, poll.options[1].id, &guest("10.0.0.2")).unwrap();
        submit_vote(&mut store, poll.id, poll.options[2].id, &guest("10.0.0.3")).unwrap();

        let results = poll_results(&mut store, poll.id, &guest("10.0.0.9")).unwrap();
        assert_eq!(results.poll_id, poll.id);
        assert_eq!(results.total_votes, 3);
        let counts: Vec<(String, i64)> = results
            .options
            .iter()
            .map(|tally| (tally.text.clone(), tally.vote_count))
            .collect();
        assert_eq!(
            counts,
            vec![
                (String::from("Aardvark"), 0),
                (String::from("Bandicoot"), 2),
                (String::from("Capuchin"), 1),
            ]
        );
    }

    #[test]
    fn unvoted_poll_reports_zeroes() {
        let mut store = MemoryStore::new();
        let poll = seed_poll(&store, Visibility::Public, Id::new());
        let results = poll_results(&mut store, poll.id, &guest("10.0.0.1")).unwrap();
        assert_eq!(results.total_votes, 0);
        assert_eq!(results.options.len(), 3);
        assert!(results.options.iter().all(|tally| tally.vote_count == 0));
    }

    #[test]
    fn results_are_gated_like_the_poll() {
        let mut store = MemoryStore::new();
        let owner = Id::new();
        let poll = seed_poll(&store, Visibility::Private, owner);

        let denied = poll_results(&mut store, poll.id, &Identity::User(Id::new()));
        assert!(matches!(denied, Err(ViewError::AccessDenied)));

        let allowed = poll_results(&mut store, poll.id, &Identity::User(owner));
        assert!(allowed.is_ok());
    }

    #[test]
    fn unknown_poll_results_are_not_found() {
        let mut store = MemoryStore::new();
        let result = poll_results(&mut store, Id::new(), &guest("10.0.0.1"));
        assert!(matches!(result, Err(ViewError::NotFound)));
    }

    #[test]
    fn my_vote_reports_the_chosen_option() {
        let mut store = MemoryStore::new();
        let poll = seed_poll(&store, Visibility::Public, Id::new());
        let voter = guest("10.0.0.1");

        assert_eq!(my_vote(&mut store, poll.id, &voter).unwrap(), None);
        submit_vote(&mut store, poll.id, poll.options[0].id, &voter).unwrap();
        assert_eq!(
            my_vote(&mut store, poll.id, &voter).unwrap(),
            Some(poll.options[0].id)
        );
        // Another voter's ballot stays invisible.
        assert_eq!(my_vote(&mut store, poll.id, &guest("10.0.0.2")).unwrap(), None);
    }

    #[test]
    fn my_vote_is_gated_like_the_poll() {
        let mut store = MemoryStore::new();
        let poll = seed_poll(&store, Visibility::Private, Id::new());
        let result = my_vote(&mut store, poll.id, &guest("10.0.0.1"));
        assert!(matches!(result, Err(ViewError::AccessDenied)));
    }
}
