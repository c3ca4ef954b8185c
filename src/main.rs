// src/main.rs

use relaunch::cli::{self, CliArgs, Invocation};
use relaunch::restart::ProcessIdentity;
use relaunch::{logging, run};

/// Conventional exit status for a process stopped by Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let args = match cli::parse() {
        Invocation::Run(args) => args,
        Invocation::Usage => {
            cli::print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = run_main(args).await {
        eprintln!("relaunch error: {err:?}");
        std::process::exit(1);
    }

    std::process::exit(EXIT_INTERRUPTED);
}

async fn run_main(args: CliArgs) -> anyhow::Result<()> {
    let identity = ProcessIdentity::capture()?;
    logging::init_logging(args.log_level)?;
    run(args, identity).await?;
    Ok(())
}
