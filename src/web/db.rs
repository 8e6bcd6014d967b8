pub mod models;
pub mod schema;
pub mod store;

use diesel::{Connection, PgConnection};

use crate::error::StoreError;

/// One connection per request; handlers hold it for the request's duration
/// and it doubles as the store implementation.
pub fn connect(database_url: &str) -> Result<PgConnection, StoreError> {
    Ok(PgConnection::establish(database_url)?)
}
