use std::process::ExitCode;

use clap::Parser;

use lungscreen_lib::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    lungscreen_lib::init_tracing();

    match lungscreen_lib::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
