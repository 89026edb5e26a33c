//! Logging arguments.

use crate::CliResult;
use clap::{ArgAction, Args};

/// Logging arguments shared by the binaries.
#[derive(Args, Default, Clone, Debug, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level. Repeat for more output (`-v` debug, `-vv` trace).
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub v: u8,
}

impl LogArgs {
    /// Installs the global tracing subscriber for these arguments.
    ///
    /// Fails if a global subscriber is already installed.
    pub fn init_tracing(&self) -> CliResult<()> {
        crate::init_tracing_subscriber(self.v, None::<tracing_subscriber::EnvFilter>)?;
        Ok(())
    }
}
