use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{Id, ShareToken};

/// Who may see (and therefore vote on) a poll.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Restricted,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Restricted => "restricted",
        }
    }

    /// Strict parse; anything outside the three known scopes is rejected so
    /// an unrecognized value can never widen access.
    pub fn parse(value: &str) -> Option<Visibility> {
        match value {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "restricted" => Some(Visibility::Restricted),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Poll {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub category: String,
    pub owner_id: Id,
    pub visibility: Visibility,
    pub share_token: ShareToken,
    pub is_active: bool,
    pub allow_guest_votes: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,

    /// Options in creation order.
    pub options: Vec<PollOption>,
    /// Additional users allowed to see a restricted poll, besides the owner.
    pub allowed_users: HashSet<Id>,
}

#[derive(Clone, Debug)]
pub struct PollOption {
    pub id: Id,
    pub text: String,
}

impl Poll {
    pub fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(expiry) if expiry < Utc::now())
    }

    pub fn has_option(&self, option_id: Id) -> bool {
        self.options.iter().any(|option| option.id == option_id)
    }
}
