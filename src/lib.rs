//! Wonderlogy server: email/password registration and login over a JSON API,
//! backed by PostgreSQL.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod state;
