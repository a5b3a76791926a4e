//! Explaincode CLI entry point.

use clap::Parser;
use explaincode::cli::{self, Cli, Commands, EXIT_ERROR};
use explaincode::logging;

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Commands::Explain(args) if args.verbose);
    if let Err(e) = logging::init_logging(verbose) {
        eprintln!("Warning: {}", e);
    }

    let result = match cli.command {
        Commands::Explain(args) => cli::run_explain(&args),
        Commands::Init(args) => cli::run_init(&args),
        Commands::Languages => cli::run_languages(),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
