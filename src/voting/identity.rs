use std::fmt::{self, Display, Formatter};
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::id::Id;

/// Normalized network-origin key for anonymous voters. The canonical text of
/// the resolved client address is the sole basis for guest deduplication:
/// voters behind one NAT or proxy share a key and therefore share one guest
/// vote per poll, and a reassigned address lets a new person appear as a
/// returning one. That is an accepted limitation of address-based identity.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct GuestOrigin(String);

impl GuestOrigin {
    /// Derives the key from a resolved client address. IPv4-mapped IPv6
    /// addresses collapse to their IPv4 form so the same caller hashes the
    /// same way regardless of which listener family accepted the socket.
    pub fn from_addr(addr: IpAddr) -> GuestOrigin {
        GuestOrigin(addr.to_canonical().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rehydrates a key that was normalized when it was first stored.
impl From<String> for GuestOrigin {
    fn from(stored: String) -> GuestOrigin {
        GuestOrigin(stored)
    }
}

impl Display for GuestOrigin {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The actor behind a request: an authenticated user or an anonymous caller
/// keyed by network origin. Exactly one of the two, by construction.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Identity {
    User(Id),
    Guest(GuestOrigin),
}

impl Identity {
    /// Maps the transport's view of a request onto a voter identity: the
    /// authenticated principal when one exists, otherwise the caller's
    /// normalized network origin.
    pub fn resolve(principal: Option<Id>, origin: IpAddr) -> Identity {
        match principal {
            Some(user_id) => Identity::User(user_id),
            None => Identity::Guest(GuestOrigin::from_addr(origin)),
        }
    }

    pub fn user_id(&self) -> Option<Id> {
        match self {
            Identity::User(id) => Some(*id),
            Identity::Guest(_) => None,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest(_))
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Identity::User(id) => write!(f, "user {id}"),
            Identity::Guest(origin) => write!(f, "guest {origin}"),
        }
    }
}
