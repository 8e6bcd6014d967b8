use uuid::Uuid;
use warp::reply::{self, Reply, Response};

use crate::voting;

use super::auth::CallerInput;
use super::models;

/// GET /api/polls/:id/results. Gated exactly like the poll itself.
pub fn get_results(poll_id: Uuid, input: CallerInput) -> Response {
    let (mut conn, identity) = match input.begin() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    match voting::poll_results(&mut conn, voting::Id(poll_id), &identity) {
        Ok(results) => reply::json(&results).into_response(),
        Err(err) => models::view_error_reply(err),
    }
}
