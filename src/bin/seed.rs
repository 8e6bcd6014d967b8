//! Development seeder: demo users with bearer tokens and a sample poll.
//! Safe to run repeatedly against the same database.

use std::error::Error;

use diesel::prelude::*;
use uuid::Uuid;

use votex_server::config::Config;
use votex_server::voting::Visibility;
use votex_server::web::db::{self, models, schema};

const ADMIN_TOKEN: &str = "admin-dev-token";
const VOTER_TOKEN: &str = "voter-dev-token";

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let conn = &mut db::connect(&config.database_url)?;

    let admin_id = ensure_user(conn, "admin", "admin@example.com")?;
    ensure_token(conn, ADMIN_TOKEN, admin_id)?;
    let voter_id = ensure_user(conn, "voter", "voter@example.com")?;
    ensure_token(conn, VOTER_TOKEN, voter_id)?;

    ensure_demo_poll(conn, admin_id)?;

    println!("Database seeded.");
    println!("admin: Authorization: Bearer {ADMIN_TOKEN}");
    println!("voter: Authorization: Bearer {VOTER_TOKEN}");
    Ok(())
}

fn ensure_user(conn: &mut PgConnection, username: &str, email: &str) -> Result<Uuid, Box<dyn Error>> {
    diesel::insert_into(schema::users::table)
        .values(&models::NewUser {
            username: String::from(username),
            email: String::from(email),
        })
        .on_conflict(schema::users::email)
        .do_nothing()
        .execute(conn)?;
    Ok(schema::users::table
        .filter(schema::users::email.eq(email))
        .select(schema::users::id)
        .first(conn)?)
}

fn ensure_token(conn: &mut PgConnection, token: &str, user_id: Uuid) -> Result<(), Box<dyn Error>> {
    diesel::insert_into(schema::auth_tokens::table)
        .values(&models::NewAuthToken {
            token: String::from(token),
            user_id,
        })
        .on_conflict(schema::auth_tokens::token)
        .do_nothing()
        .execute(conn)?;
    Ok(())
}

fn ensure_demo_poll(conn: &mut PgConnection, owner_id: Uuid) -> Result<(), Box<dyn Error>> {
    let title = "Best Programming Language";
    let existing = schema::polls::table
        .filter(schema::polls::title.eq(title))
        .select(schema::polls::id)
        .first::<Uuid>(conn)
        .optional()?;
    if existing.is_some() {
        return Ok(());
    }

    let poll_id = diesel::insert_into(schema::polls::table)
        .values(&models::NewPoll {
            title: String::from(title),
            description: String::from("Vote for your favorite language"),
            category: String::from("Technology"),
            owner_id,
            visibility: String::from(Visibility::Public.as_str()),
            share_token: Uuid::new_v4(),
            is_active: true,
            allow_guest_votes: true,
            expires_at: None,
        })
        .returning(schema::polls::id)
        .get_result::<Uuid>(conn)?;

    for (position, text) in ["Python", "Rust", "Go", "JavaScript"].into_iter().enumerate() {
        diesel::insert_into(schema::options::table)
            .values(&models::NewPollOption {
                poll_id,
                text: String::from(text),
                position: position as i32,
            })
            .execute(conn)?;
    }
    Ok(())
}
