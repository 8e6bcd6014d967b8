use std::net::{IpAddr, SocketAddr};

use diesel::prelude::*;
use uuid::Uuid;
use warp::reply::Response;

use crate::config::Config;
use crate::error::{IdentityError, StoreError};
use crate::voting::{Id, Identity};

use super::db::{self, schema};
use super::models;

/// Raw request facts each handler needs to work out who is calling.
#[derive(Clone)]
pub struct CallerInput {
    pub authorization: Option<String>,
    pub forwarded_for: Option<String>,
    pub remote: Option<SocketAddr>,
    pub config: Config,
}

impl CallerInput {
    /// Resolve the request to a voter identity. An absent Authorization
    /// header means guest; a present but unusable one is an error, never a
    /// silent downgrade to guest.
    pub fn resolve(&self, conn: &mut PgConnection) -> Result<Identity, IdentityError> {
        let principal = match self.authorization.as_deref() {
            Some(header) => Some(principal_for(conn, header)?),
            None => None,
        };
        let origin = client_addr(
            self.remote,
            self.forwarded_for.as_deref(),
            self.config.trust_proxy,
        )?;
        Ok(Identity::resolve(principal, origin))
    }

    /// Handler preamble: open a connection and resolve the caller, or give
    /// back the error response to send instead.
    pub fn begin(&self) -> Result<(PgConnection, Identity), Response> {
        let mut conn = match db::connect(&self.config.database_url) {
            Ok(conn) => conn,
            Err(err) => return Err(models::store_failure(&err)),
        };
        let identity = match self.resolve(&mut conn) {
            Ok(identity) => identity,
            Err(err) => return Err(models::identity_error_reply(err)),
        };
        Ok((conn, identity))
    }
}

/// Look up a bearer credential. Malformed and unknown tokens read the same
/// from outside.
fn principal_for(conn: &mut PgConnection, header: &str) -> Result<Id, IdentityError> {
    let token = parse_bearer(header).ok_or(IdentityError::BadCredentials)?;
    let user_id = schema::auth_tokens::table
        .filter(schema::auth_tokens::token.eq(token))
        .select(schema::auth_tokens::user_id)
        .first::<Uuid>(conn)
        .optional()
        .map_err(StoreError::from)?;
    user_id.map(Id).ok_or(IdentityError::BadCredentials)
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() || token.contains(' ') {
        return None;
    }
    Some(token)
}

/// The address guest votes are keyed on. Behind a trusted proxy the first
/// `X-Forwarded-For` entry wins; otherwise the socket peer address.
pub fn client_addr(
    remote: Option<SocketAddr>,
    forwarded_for: Option<&str>,
    trust_proxy: bool,
) -> Result<IpAddr, IdentityError> {
    if trust_proxy {
        if let Some(header) = forwarded_for {
            let first = header.split(',').next().unwrap_or("").trim();
            return first.parse().map_err(|_| IdentityError::UnknownOrigin);
        }
    }
    remote
        .map(|addr| addr.ip())
        .ok_or(IdentityError::UnknownOrigin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(addr: &str) -> Option<SocketAddr> {
        Some(addr.parse().unwrap())
    }

    #[test]
    fn bearer_header_parses() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("Bearer  abc123 "), Some("abc123"));
    }

    #[test]
    fn non_bearer_headers_are_rejected() {
        assert_eq!(parse_bearer("Token abc123"), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Bearer two parts"), None);
        assert_eq!(parse_bearer(""), None);
    }

    #[test]
    fn peer_address_without_proxy() {
        let addr = client_addr(peer("203.0.113.7:4411"), None, false).unwrap();
        assert_eq!(addr.to_string(), "203.0.113.7");
    }

    #[test]
    fn forwarded_header_is_ignored_when_untrusted() {
        let addr = client_addr(peer("203.0.113.7:4411"), Some("198.51.100.1"), false).unwrap();
        assert_eq!(addr.to_string(), "203.0.113.7");
    }

    #[test]
    fn trusted_proxy_takes_first_forwarded_entry() {
        let addr = client_addr(
            peer("10.0.0.2:80"),
            Some("198.51.100.1, 10.0.0.2"),
            true,
        )
        .unwrap();
        assert_eq!(addr.to_string(), "198.51.100.1");
    }

    #[test]
    fn trusted_proxy_without_header_falls_back_to_peer() {
        let addr = client_addr(peer("203.0.113.7:4411"), None, true).unwrap();
        assert_eq!(addr.to_string(), "203.0.113.7");
    }

    #[test]
    fn unparseable_forwarded_entry_is_an_error() {
        let result = client_addr(peer("10.0.0.2:80"), Some("not-an-address"), true);
        assert!(matches!(result, Err(IdentityError::UnknownOrigin)));
    }

    #[test]
    fn missing_peer_is_an_error() {
        let result = client_addr(None, None, false);
        assert!(matches!(result, Err(IdentityError::UnknownOrigin)));
    }
}
