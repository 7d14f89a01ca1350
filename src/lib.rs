//! User-user collaborative filtering.
//!
//! Predicts how a user would rate items from the mean-centered ratings of the 30 most
//! similar users that rated each item, weighted by cosine similarity.

pub mod config;
pub mod io;
pub mod logging;
pub mod metrics;
pub mod stopwatch;
pub mod store;
pub mod uuknn;
