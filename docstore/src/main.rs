//! `docstore` binary: load settings, open the store, run one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use docstore::inbound::cli::{Cli, run};
use docstore::{DocumentStore, StoreSettings};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let outcome = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = outcome {
        warn!(error = %e, "tracing init failed");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = StoreSettings::load("docstore")
        .and_then(|settings| settings.into_config(cli.root.as_deref()))
        .map_err(|error| error.to_string())
        .and_then(|config| {
            let store = DocumentStore::open(config);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run(&store, cli.command, &mut out).map_err(|error| error.to_string())?;
            out.flush().map_err(|error| error.to_string())
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let mut stderr = io::stderr();
            if writeln!(stderr, "docstore: {message}").is_err() {
                // Nothing left to report to.
            }
            ExitCode::FAILURE
        }
    }
}
