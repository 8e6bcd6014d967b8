use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::error::StoreError;
use crate::voting;

use super::schema;

#[derive(Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::polls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Poll {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub owner_id: Uuid,
    pub visibility: String,
    pub share_token: Uuid,
    pub is_active: bool,
    pub allow_guest_votes: bool,
    pub expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Poll {
    /// Assemble the domain poll from its row plus the rows of its satellite
    /// tables. Option rows are expected in display order. A visibility value
    /// outside the known set fails the whole load, so a bad row denies
    /// access rather than granting any.
    pub fn into_domain(
        self,
        options: Vec<PollOption>,
        allowed_users: Vec<Uuid>,
    ) -> Result<voting::Poll, StoreError> {
        let Self {
            id,
            title,
            description,
            category,
            owner_id,
            visibility,
            share_token,
            is_active,
            allow_guest_votes,
            expires_at,
            created_at,
        } = self;

        let visibility = voting::Visibility::parse(&visibility).ok_or_else(|| {
            StoreError::new(format!(
                "poll {id} has unrecognized visibility {visibility:?}"
            ))
        })?;

        Ok(voting::Poll {
            id: voting::Id(id),
            title,
            description,
            category,
            owner_id: voting::Id(owner_id),
            visibility,
            share_token: voting::ShareToken(share_token),
            is_active,
            allow_guest_votes,
            expires_at: expires_at.map(|t| t.and_utc()),
            created_at: created_at.and_utc(),
            options: options.into_iter().map(Into::into).collect(),
            allowed_users: allowed_users.into_iter().map(voting::Id).collect(),
        })
    }
}

#[derive(Associations, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Poll))]
pub struct PollOption {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub text: String,
    pub position: i32,
}

impl From<PollOption> for voting::PollOption {
    fn from(row: PollOption) -> voting::PollOption {
        voting::PollOption {
            id: voting::Id(row.id),
            text: row.text,
        }
    }
}

#[derive(Associations, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Poll))]
pub struct Vote {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_origin: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Vote> for voting::Vote {
    type Error = StoreError;

    fn try_from(row: Vote) -> Result<voting::Vote, StoreError> {
        let Vote {
            id,
            poll_id,
            option_id,
            user_id,
            guest_origin,
            created_at,
        } = row;

        // The table CHECK makes exactly one of the pair non-null; a row that
        // violates it anyway must not be counted under either identity.
        let voter = match (user_id, guest_origin) {
            (Some(user_id), None) => voting::Identity::User(voting::Id(user_id)),
            (None, Some(origin)) => voting::Identity::Guest(voting::GuestOrigin::from(origin)),
            _ => {
                return Err(StoreError::new(format!(
                    "vote {id} names both or neither of user and guest origin"
                )));
            }
        };

        Ok(voting::Vote {
            id: voting::Id(id),
            poll_id: voting::Id(poll_id),
            option_id: voting::Id(option_id),
            voter,
            created_at: created_at.and_utc(),
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = schema::votes)]
pub struct NewVote {
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_origin: Option<String>,
}

impl From<&voting::NewVote> for NewVote {
    fn from(vote: &voting::NewVote) -> NewVote {
        let (user_id, guest_origin) = match &vote.voter {
            voting::Identity::User(id) => (Some(id.0), None),
            voting::Identity::Guest(origin) => (None, Some(String::from(origin.as_str()))),
        };
        NewVote {
            poll_id: vote.poll_id.0,
            option_id: vote.option_id.0,
            user_id,
            guest_origin,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::auth_tokens)]
pub struct NewAuthToken {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Insertable)]
#[diesel(table_name = schema::polls)]
pub struct NewPoll {
    pub title: String,
    pub description: String,
    pub category: String,
    pub owner_id: Uuid,
    pub visibility: String,
    pub share_token: Uuid,
    pub is_active: bool,
    pub allow_guest_votes: bool,
    pub expires_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = schema::options)]
pub struct NewPollOption {
    pub poll_id: Uuid,
    pub text: String,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = schema::poll_allowed_users)]
pub struct NewAllowedUser {
    pub poll_id: Uuid,
    pub user_id: Uuid,
}
