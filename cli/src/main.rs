//! Stevedore - compose wrapper with application expansion

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    stevedore_cli::logging::init();
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    match stevedore_cli::cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
