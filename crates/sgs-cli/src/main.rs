mod cmd;
mod output;

use clap::Parser;
use cmd::audit::AuditArgs;

/// Exit status used when the run is interrupted with Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(
    name = "sgs-audit",
    about = "Audit linter, formatter and type-checker configs for conflicting settings",
    version
)]
struct Cli {
    #[command(flatten)]
    audit: AuditArgs,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    let mut filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into());
    if verbose {
        for directive in ["sgs_core=debug", "claude_api=debug"] {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.audit.verbose);

    if let Err(e) = ctrlc::set_handler(|| {
        sgs_core::io::remove_in_flight();
        eprintln!("\nInterrupted");
        std::process::exit(EXIT_INTERRUPTED);
    }) {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }

    if let Err(e) = cmd::audit::run(cli.audit) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
