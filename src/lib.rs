//! Library exports for starter-rpc, shared between the binary and tests.

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
