use std::process::ExitCode;

use sablec::CliError;

fn main() -> ExitCode {
    match sablec::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::BuildDiagnostics) => sablec::exit_code_compilation_failed(),
        Err(err) => {
            eprintln!("sablec: {err}");
            ExitCode::FAILURE
        }
    }
}
