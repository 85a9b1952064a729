//! Command-line interface.

pub mod args;

pub use args::{load_env_file, Args, StrategyArg};
