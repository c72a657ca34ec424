//! Library exports for the ads dashboard backend
//!
//! The pure core (metrics, insight cohorts, seeding, link intake) is usable
//! on its own; the database, handlers and routes make up the REST backend,
//! and `client` talks to it over HTTP.

pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handler;
pub mod insights;
pub mod intake;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod route;
pub mod seeder;
