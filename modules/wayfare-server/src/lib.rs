pub mod admin;
pub mod auth;
pub mod jwt;
pub mod rest;
pub mod routes;
pub mod serializers;

pub use routes::{build_router, AppState};
