//! Personal movie-watch log: watch records enriched with poster art, served as a
//! newest-first timeline and as a month calendar, with password-gated writes.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
