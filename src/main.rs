use clap::Parser;
use foldersort::cli::{Args, init_logging, run};
use foldersort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        OutputFormatter::error(&format!("Error: {}", e));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
