//! Binary entrypoint for the glomer node.

use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use glomer_node::{Config, run, telemetry};

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(error) = telemetry::initialise(&config) {
        writeln!(io::stderr().lock(), "glomer-node: {error}").ok();
        return ExitCode::FAILURE;
    }

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match run(&config, &mut reader, &mut writer) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "session ended with an error");
            writeln!(io::stderr().lock(), "glomer-node: {error}").ok();
            ExitCode::FAILURE
        }
    }
}
