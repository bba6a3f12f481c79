// Library exports for integration tests
pub mod api;
pub mod config;
pub mod db;
pub mod form;
pub mod handlers;
pub mod inflight;
pub mod login;
pub mod models;
pub mod redirect;
pub mod session;
pub mod templates;
