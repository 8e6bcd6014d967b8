use diesel::PgConnection;
use uuid::Uuid;
use warp::reply::{self, Reply, Response};

use crate::voting;

use super::auth::CallerInput;
use super::models::{self, PollBody};

pub fn list(input: CallerInput) -> Response {
    let (mut conn, identity) = match input.begin() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    let polls = match voting::visible_polls(&mut conn, &identity) {
        Ok(polls) => polls,
        Err(err) => return models::store_failure(&err),
    };

    let mut bodies = Vec::with_capacity(polls.len());
    for poll in polls {
        let results = match voting::tally(&mut conn, &poll) {
            Ok(results) => results,
            Err(err) => return models::store_failure(&err),
        };
        bodies.push(PollBody::new(poll, results));
    }
    reply::json(&bodies).into_response()
}

pub fn detail(poll_id: Uuid, input: CallerInput) -> Response {
    let (mut conn, identity) = match input.begin() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    match voting::visible_poll(&mut conn, voting::Id(poll_id), &identity) {
        Ok(poll) => poll_reply(&mut conn, poll),
        Err(err) => models::view_error_reply(err),
    }
}

pub fn by_share_token(token: Uuid, input: CallerInput) -> Response {
    let (mut conn, identity) = match input.begin() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    match voting::visible_poll_by_token(&mut conn, voting::ShareToken(token), &identity) {
        Ok(poll) => poll_reply(&mut conn, poll),
        Err(err) => models::view_error_reply(err),
    }
}

fn poll_reply(conn: &mut PgConnection, poll: voting::Poll) -> Response {
    match voting::tally(conn, &poll) {
        Ok(results) => reply::json(&PollBody::new(poll, results)).into_response(),
        Err(err) => models::store_failure(&err),
    }
}
