use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

use crate::error::{IdentityError, StoreError, ViewError, VoteError};
use crate::voting::{Id, Poll, PollResults, ShareToken, Visibility};

/// An option as embedded in poll bodies, already decorated with its count.
#[derive(Serialize)]
pub struct OptionBody {
    pub id: Id,
    pub text: String,
    pub votes: i64,
}

/// Poll as served by the list, detail, and share-link endpoints.
#[derive(Serialize)]
pub struct PollBody {
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
    pub options: Vec<OptionBody>,
    pub total_votes: i64,
}

impl PollBody {
    pub fn new(poll: Poll, results: PollResults) -> PollBody {
        PollBody {
            id: poll.id,
            title: poll.title,
            description: poll.description,
            category: poll.category,
            owner_id: poll.owner_id,
            visibility: poll.visibility,
            share_token: poll.share_token,
            is_active: poll.is_active,
            allow_guest_votes: poll.allow_guest_votes,
            expires_at: poll.expires_at,
            created_at: poll.created_at,
            options: results
                .options
                .into_iter()
                .map(|tally| OptionBody {
                    id: tally.id,
                    text: tally.text,
                    votes: tally.vote_count,
                })
                .collect(),
            total_votes: results.total_votes,
        }
    }
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub option_id: Id,
}

#[derive(Serialize)]
pub struct VoteReceipt {
    pub success: bool,
    pub option_id: Id,
}

#[derive(Serialize)]
pub struct MyVoteBody {
    pub option_id: Option<Id>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
}

pub fn error_reply(code: StatusCode, message: &str) -> Response {
    reply::with_status(
        reply::json(&ErrorBody {
            success: false,
            message,
        }),
        code,
    )
    .into_response()
}

/// Storage failures surface as a plain 500; the details go to the log, not
/// the client.
pub fn store_failure(err: &StoreError) -> Response {
    error!(error = %err, "storage failure");
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

pub fn vote_error_reply(err: VoteError) -> Response {
    let code = match &err {
        VoteError::NotFound => StatusCode::NOT_FOUND,
        VoteError::PollInactive | VoteError::PollExpired | VoteError::AlreadyVoted => {
            StatusCode::CONFLICT
        }
        VoteError::AccessDenied | VoteError::GuestVotingDisabled => StatusCode::FORBIDDEN,
        VoteError::Store(source) => return store_failure(source),
    };
    error_reply(code, &err.to_string())
}

pub fn view_error_reply(err: ViewError) -> Response {
    let code = match &err {
        ViewError::NotFound => StatusCode::NOT_FOUND,
        ViewError::AccessDenied => StatusCode::FORBIDDEN,
        ViewError::Store(source) => return store_failure(source),
    };
    error_reply(code, &err.to_string())
}

pub fn identity_error_reply(err: IdentityError) -> Response {
    let code = match &err {
        IdentityError::BadCredentials => StatusCode::UNAUTHORIZED,
        IdentityError::UnknownOrigin => StatusCode::BAD_REQUEST,
        IdentityError::Store(source) => return store_failure(source),
    };
    error_reply(code, &err.to_string())
}
