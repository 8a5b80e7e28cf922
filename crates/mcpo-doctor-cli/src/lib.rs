//! `mcpo-doctor` command-line adapter.
//!
//! Parses arguments, composes the adapters and renders the diagnostic's
//! verdict stream on the console.
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use error::CliError;
pub use parser::Cli;
pub use presentation::ConsoleReporter;
