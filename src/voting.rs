mod admission;
mod id;
mod identity;
mod poll;
mod results;
mod store;
mod visibility;
mod vote;

pub use admission::{change_vote, submit_vote, VoteOutcome};
pub use id::{Id, ShareToken};
pub use identity::{GuestOrigin, Identity};
pub use poll::{Poll, PollOption, Visibility};
pub use results::{my_vote, poll_results, tally, OptionTally, PollResults};
pub use store::{MemoryStore, PollStore, VoteLedger};
pub use visibility::{can_view, visible_poll, visible_poll_by_token, visible_polls};
pub use vote::{NewVote, Vote};
