use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DbError};
use uuid::Uuid;

use crate::error::{InsertError, StoreError};
use crate::voting::{self, Id, Identity, PollStore, ShareToken, VoteLedger};

use super::{models, schema};

/// Load the option and membership rows belonging to a poll row and convert
/// the lot into the domain type.
fn assemble_poll(conn: &mut PgConnection, row: models::Poll) -> Result<voting::Poll, StoreError> {
    let options = schema::options::table
        .filter(schema::options::poll_id.eq(row.id))
        .order(schema::options::position.asc())
        .select(models::PollOption::as_select())
        .load(conn)?;
    let allowed_users = schema::poll_allowed_users::table
        .filter(schema::poll_allowed_users::poll_id.eq(row.id))
        .select(schema::poll_allowed_users::user_id)
        .load::<Uuid>(conn)?;
    row.into_domain(options, allowed_users)
}

impl PollStore for PgConnection {
    fn poll_by_id(&mut self, poll_id: Id) -> Result<Option<voting::Poll>, StoreError> {
        let row = schema::polls::table
            .filter(schema::polls::id.eq(poll_id.0))
            .select(models::Poll::as_select())
            .first(self)
            .optional()?;
        match row {
            Some(row) => Ok(Some(assemble_poll(self, row)?)),
            None => Ok(None),
        }
    }

    fn poll_by_option(&mut self, option_id: Id) -> Result<Option<voting::Poll>, StoreError> {
        let poll_id = schema::options::table
            .filter(schema::options::id.eq(option_id.0))
            .select(schema::options::poll_id)
            .first::<Uuid>(self)
            .optional()?;
        match poll_id {
            Some(poll_id) => self.poll_by_id(Id(poll_id)),
            None => Ok(None),
        }
    }

    fn poll_by_share_token(&mut self, token: ShareToken) -> Result<Option<voting::Poll>, StoreError> {
        let row = schema::polls::table
            .filter(schema::polls::share_token.eq(token.0))
            .select(models::Poll::as_select())
            .first(self)
            .optional()?;
        match row {
            Some(row) => Ok(Some(assemble_poll(self, row)?)),
            None => Ok(None),
        }
    }

    fn polls_for(&mut self, identity: &Identity) -> Result<Vec<voting::Poll>, StoreError> {
        let rows = match identity.user_id() {
            Some(user_id) => {
                let member_of = schema::poll_allowed_users::table
                    .filter(schema::poll_allowed_users::user_id.eq(user_id.0))
                    .select(schema::poll_allowed_users::poll_id);
                schema::polls::table
                    .filter(
                        schema::polls::visibility
                            .eq("public")
                            .or(schema::polls::owner_id.eq(user_id.0))
                            .or(schema::polls::id.eq_any(member_of)),
                    )
                    .order(schema::polls::created_at.desc())
                    .select(models::Poll::as_select())
                    .load(self)?
            }
            None => schema::polls::table
                .filter(
                    schema::polls::visibility
                        .eq("public")
                        .and(schema::polls::is_active.eq(true)),
                )
                .order(schema::polls::created_at.desc())
                .select(models::Poll::as_select())
                .load(self)?,
        };

        let mut polls = Vec::with_capacity(rows.len());
        for row in rows {
            polls.push(assemble_poll(self, row)?);
        }
        Ok(polls)
    }
}

impl VoteLedger for PgConnection {
    fn has_vote(&mut self, poll_id: Id, voter: &Identity) -> Result<bool, StoreError> {
        let present = match voter {
            Identity::User(user_id) => diesel::select(exists(
                schema::votes::table.filter(
                    schema::votes::poll_id
                        .eq(poll_id.0)
                        .and(schema::votes::user_id.eq(user_id.0)),
                ),
            ))
            .get_result::<bool>(self)?,
            Identity::Guest(origin) => diesel::select(exists(
                schema::votes::table.filter(
                    schema::votes::poll_id
                        .eq(poll_id.0)
                        .and(schema::votes::user_id.is_null())
                        .and(schema::votes::guest_origin.eq(origin.as_str())),
                ),
            ))
            .get_result::<bool>(self)?,
        };
        Ok(present)
    }

    fn insert_vote(&mut self, vote: &voting::NewVote) -> Result<voting::Vote, InsertError> {
        let row = models::NewVote::from(vote);
        let inserted = diesel::insert_into(schema::votes::table)
            .values(&row)
            .returning(models::Vote::as_returning())
            .get_result::<models::Vote>(self);
        match inserted {
            Ok(row) => Ok(voting::Vote::try_from(row)?),
            Err(DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(InsertError::UniqueViolation)
            }
            Err(err) => Err(InsertError::Store(err.into())),
        }
    }

    fn find_vote(&mut self, poll_id: Id, voter: &Identity) -> Result<Option<voting::Vote>, StoreError> {
        let row = match voter {
            Identity::User(user_id) => schema::votes::table
                .filter(
                    schema::votes::poll_id
                        .eq(poll_id.0)
                        .and(schema::votes::user_id.eq(user_id.0)),
                )
                .select(models::Vote::as_select())
                .first(self)
                .optional()?,
            Identity::Guest(origin) => schema::votes::table
                .filter(
                    schema::votes::poll_id
                        .eq(poll_id.0)
                        .and(schema::votes::user_id.is_null())
                        .and(schema::votes::guest_origin.eq(origin.as_str())),
                )
                .select(models::Vote::as_select())
                .first(self)
                .optional()?,
        };
        row.map(voting::Vote::try_from).transpose()
    }

    fn reassign_vote(
        &mut self,
        poll_id: Id,
        voter: &Identity,
        option_id: Id,
    ) -> Result<Option<voting::Vote>, StoreError> {
        let updated = match voter {
            Identity::User(user_id) => diesel::update(
                schema::votes::table.filter(
                    schema::votes::poll_id
                        .eq(poll_id.0)
                        .and(schema::votes::user_id.eq(user_id.0)),
                ),
            )
            .set(schema::votes::option_id.eq(option_id.0))
            .returning(models::Vote::as_returning())
            .get_result::<models::Vote>(self)
            .optional()?,
            Identity::Guest(origin) => diesel::update(
                schema::votes::table.filter(
                    schema::votes::poll_id
                        .eq(poll_id.0)
                        .and(schema::votes::user_id.is_null())
                        .and(schema::votes::guest_origin.eq(origin.as_str())),
                ),
            )
            .set(schema::votes::option_id.eq(option_id.0))
            .returning(models::Vote::as_returning())
            .get_result::<models::Vote>(self)
            .optional()?,
        };
        updated.map(voting::Vote::try_from).transpose()
    }

    fn count_by_option(&mut self, option_id: Id) -> Result<i64, StoreError> {
        Ok(schema::votes::table
            .filter(schema::votes::option_id.eq(option_id.0))
            .count()
            .get_result(self)?)
    }

    fn count_by_poll(&mut self, poll_id: Id) -> Result<i64, StoreError> {
        Ok(schema::votes::table
            .filter(schema::votes::poll_id.eq(poll_id.0))
            .count()
            .get_result(self)?)
    }
}
