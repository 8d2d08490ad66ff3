//! Inbound adapters: the operator CLI.

pub mod cli;
