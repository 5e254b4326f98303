//! # drawer Entry Point
//!
//! Sets up logging, runs one command line through [`drawer_cli::run`] and
//! maps the result to an exit status.
//!
//! ## Exit Status
//! - `0` command succeeded
//! - `1` command failed (validation, capacity, storage, ...)
//! - `2` arguments could not be parsed
//!
//! With `--json`, errors are printed to stdout as `{"code", "message", "hint"}`.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    drawer_cli::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|arg| arg == "--json");

    match drawer_cli::run(args).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if json {
                match serde_json::to_string(&e) {
                    Ok(payload) => println!("{}", payload),
                    Err(_) => eprintln!("error: {}", e),
                }
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
