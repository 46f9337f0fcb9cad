//! Power-off adapter.
//!
//! Implements [`PowerPort`] by running the configured host command
//! (`sudo shutdown -h now` on the appliance).  A failure to spawn or a
//! non-zero exit is logged; the controller has already closed every pump
//! by the time this runs.

use std::process::Command;

use log::{error, info};

use crate::app::ports::PowerPort;

pub struct CommandShutdown {
    argv: Vec<String>,
    execute: bool,
    requested: bool,
}

impl CommandShutdown {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            execute: true,
            requested: false,
        }
    }

    /// Log the command instead of running it.
    pub fn dry_run(argv: Vec<String>) -> Self {
        Self {
            execute: false,
            ..Self::new(argv)
        }
    }

    /// Whether a shutdown has been asked for.
    pub fn requested(&self) -> bool {
        self.requested
    }
}

impl PowerPort for CommandShutdown {
    fn shutdown(&mut self) {
        self.requested = true;
        let Some((program, args)) = self.argv.split_first() else {
            error!("no shutdown command configured");
            return;
        };
        if !self.execute {
            info!("Would run shutdown command: {}", self.argv.join(" "));
            return;
        }
        info!("Running shutdown command: {}", self.argv.join(" "));
        match Command::new(program).args(args).status() {
            Ok(status) if status.success() => {}
            Ok(status) => error!("'{}' exited with {}", program, status),
            Err(e) => error!("could not run '{}': {}", program, e),
        }
    }
}
