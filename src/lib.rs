pub mod config;
pub mod error;
pub mod voting;
pub mod web;
