#![warn(clippy::unwrap_used)]

pub mod auth_rest;
pub mod guard;
pub mod navigation_rest;
pub mod rest;
pub mod server;

pub use server::ApiServer;
