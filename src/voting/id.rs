use std::clone::Clone;
use std::cmp::{Eq, PartialEq};
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for users, polls, options, and votes.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Id(pub Uuid);

impl Id {
    pub const fn nil() -> Id {
        Id(Uuid::nil())
    }
    pub fn new() -> Id {
        Id(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Id {
        Id::new()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for Id {
    fn from(value: Uuid) -> Id {
        Id(value)
    }
}

/// Unguessable link token for a poll, independent of its primary id. A v4
/// UUID carries the 122 random bits the share links rely on.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShareToken(pub Uuid);

impl ShareToken {
    pub fn new() -> ShareToken {
        ShareToken(Uuid::new_v4())
    }
}

impl Default for ShareToken {
    fn default() -> ShareToken {
        ShareToken::new()
    }
}

impl Display for ShareToken {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ShareToken {
    fn from(value: Uuid) -> ShareToken {
        ShareToken(value)
    }
}
