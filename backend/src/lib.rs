//! # Transit Quest
//!
//! Core of an exoplanet-discovery game: synthetic light curves plus the
//! search → candidate → questions → summary wizard that walks a player
//! through judging a transit signal.
//!
//! ## Architecture
//!
//! - [`models`]: light-curve series, answers, candidates, filters, stellar tables
//! - [`synthesis`]: transit and false-positive generators, periodogram, tutorial curve
//! - [`wizard`]: the session state machine with its candidate guard
//! - [`catalog`]: candidate systems and selection policies
//! - [`services`]: background search, search tracking, tutorial animation, system scene
//! - [`config`]: `transit.toml` loading with environment overrides
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! All randomness is injected: generators take any [`rand::Rng`], so a
//! seeded `StdRng` reproduces a run exactly.

pub mod api;
pub mod catalog;
pub mod config;
pub mod models;
pub mod services;
pub mod synthesis;
pub mod wizard;

#[cfg(feature = "http-server")]
pub mod http;
