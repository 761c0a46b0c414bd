//! Payment records service: REST API over a payments table with a
//! read-through cache and a simulated processing step.

pub mod config;
pub mod database;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod requests;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;
