//! cwlogger CLI library.
//!
//! Argument types and the submission step behind the `put` subcommand, kept
//! out of `main.rs` so they can be unit tested.

pub mod put;
