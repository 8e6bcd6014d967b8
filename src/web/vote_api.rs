use uuid::Uuid;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

use crate::voting::{self, VoteOutcome};

use super::auth::CallerInput;
use super::models::{self, MyVoteBody, VoteReceipt, VoteRequest};

/// POST /api/polls/:id/vote. A second vote from the same voter is a
/// conflict; changing is its own verb.
pub fn cast(poll_id: Uuid, body: VoteRequest, input: CallerInput) -> Response {
    let (mut conn, identity) = match input.begin() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    match voting::submit_vote(&mut conn, voting::Id(poll_id), body.option_id, &identity) {
        Ok(outcome) => receipt(StatusCode::CREATED, &outcome),
        Err(err) => models::vote_error_reply(err),
    }
}

/// PUT /api/polls/:id/vote. Moves an existing vote, or casts one when the
/// voter has none yet; the status code tells the caller which happened.
pub fn change(poll_id: Uuid, body: VoteRequest, input: CallerInput) -> Response {
    let (mut conn, identity) = match input.begin() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    match voting::change_vote(&mut conn, voting::Id(poll_id), body.option_id, &identity) {
        Ok(outcome @ VoteOutcome::Created(_)) => receipt(StatusCode::CREATED, &outcome),
        Ok(outcome @ VoteOutcome::Changed(_)) => receipt(StatusCode::OK, &outcome),
        Err(err) => models::vote_error_reply(err),
    }
}

/// GET /api/polls/:id/vote. The caller's own vote, if any.
pub fn mine(poll_id: Uuid, input: CallerInput) -> Response {
    let (mut conn, identity) = match input.begin() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    match voting::my_vote(&mut conn, voting::Id(poll_id), &identity) {
        Ok(option_id) => reply::json(&MyVoteBody { option_id }).into_response(),
        Err(err) => models::view_error_reply(err),
    }
}

fn receipt(code: StatusCode, outcome: &VoteOutcome) -> Response {
    reply::with_status(
        reply::json(&VoteReceipt {
            success: true,
            option_id: outcome.vote().option_id,
        }),
        code,
    )
    .into_response()
}
