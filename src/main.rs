#![allow(clippy::cargo_common_metadata)]
use bitloop_cli::{cli, config::Config, exit_code_for, setup_logging};

fn main() {
    // Parse command line arguments; usage errors exit here
    let args = cli::parse_args();

    // Setup logging based on debug flag
    if let Err(e) = setup_logging(args.debug) {
        eprintln!("Warning: {e}");
    }

    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
}

fn run(args: &cli::Args) -> anyhow::Result<i32> {
    // Initialize configuration
    let config = Config::from_args(args)?;

    // Execute the appropriate command
    cli::execute_command(&config, &args.command)
}
