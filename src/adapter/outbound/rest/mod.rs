//! Remote persistence over a PostgREST-style HTTP API.

pub mod client;
pub mod settings;

pub use client::RestAdapter;
pub use settings::{RemoteConfig, API_KEY_ENV};
