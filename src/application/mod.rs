//! Application layer - the setup use case.
//!
//! This layer orchestrates the flow between the command layer and the
//! platform, provider, download and pipeline modules.

mod setup;

pub use setup::{SetupOptions, SetupOutcome, SetupUseCase, VERSION_OUTPUT};
