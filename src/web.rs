mod auth;
pub mod db;
mod models;
mod poll_api;
mod result_api;
mod vote_api;

use std::convert::Infallible;

use tracing::{info, warn};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Filter;

use crate::config::Config;
use auth::CallerInput;

pub async fn setup(config: Config) {
    let port = config.port;
    let caller = caller_filter(config);

    // Read endpoints
    let list_polls = warp::get()
        .and(warp::path!("api" / "polls"))
        .and(caller.clone())
        .map(poll_api::list);
    let poll_by_share = warp::get()
        .and(warp::path!("api" / "polls" / "share" / Uuid))
        .and(caller.clone())
        .map(poll_api::by_share_token);
    let poll_results = warp::get()
        .and(warp::path!("api" / "polls" / Uuid / "results"))
        .and(caller.clone())
        .map(result_api::get_results);
    let poll_detail = warp::get()
        .and(warp::path!("api" / "polls" / Uuid))
        .and(caller.clone())
        .map(poll_api::detail);

    // Vote endpoints
    let cast_vote = warp::post()
        .and(warp::path!("api" / "polls" / Uuid / "vote"))
        .and(warp::body::json())
        .and(caller.clone())
        .map(vote_api::cast);
    let change_vote = warp::put()
        .and(warp::path!("api" / "polls" / Uuid / "vote"))
        .and(warp::body::json())
        .and(caller.clone())
        .map(vote_api::change);
    let my_vote = warp::get()
        .and(warp::path!("api" / "polls" / Uuid / "vote"))
        .and(caller)
        .map(vote_api::mine);

    let routes = list_polls
        .or(poll_by_share)
        .or(poll_results)
        .or(my_vote)
        .or(poll_detail)
        .or(cast_vote)
        .or(change_vote)
        .recover(handle_rejection)
        .with(warp::log("votex_server"));

    info!(port, "listening");
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}

fn caller_filter(
    config: Config,
) -> impl Filter<Extract = (CallerInput,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::header::optional::<String>("x-forwarded-for"))
        .and(warp::addr::remote())
        .map(move |authorization, forwarded_for, remote| CallerInput {
            authorization,
            forwarded_for,
            remote,
            config: config.clone(),
        })
}

/// Shape warp's own rejections into the same envelope the handlers use.
async fn handle_rejection(rejection: warp::Rejection) -> Result<Response, Infallible> {
    if rejection.is_not_found() {
        return Ok(models::error_reply(StatusCode::NOT_FOUND, "not found"));
    }
    if rejection
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        return Ok(models::error_reply(
            StatusCode::BAD_REQUEST,
            "invalid request body",
        ));
    }
    if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(models::error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed",
        ));
    }
    warn!(?rejection, "unhandled rejection");
    Ok(models::error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred. Please try again later.",
    ))
}
