//! lsp-wire - Language Server Protocol wire-format checker
//!
//! Decodes LSP params with the typed model, re-encodes them and reports
//! what changed.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lsp_wire::app::App;
use lsp_wire::cli::output::failure_response;
use lsp_wire::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Quiet by default; RUST_LOG=lsp_wire=debug or --verbose for more
    let default_filter = if cli.verbose {
        "lsp_wire=debug"
    } else {
        "lsp_wire=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let compact = cli.compact;
    if let Err(e) = run(cli) {
        // All errors are output as JSON for consistent consumption
        let response = failure_response(&e);
        let rendered = if compact {
            serde_json::to_string(&response)
        } else {
            serde_json::to_string_pretty(&response)
        };
        println!(
            "{}",
            rendered.unwrap_or_else(|_| format!(r#"{{"success":false,"error":"{}"}}"#, e))
        );
        std::process::exit(2);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    use lsp_wire::cli::commands;

    let app = App::new(cli.compact).map_err(|e| anyhow::anyhow!("Failed to initialize: {}", e))?;

    match cli.command {
        Commands::Check(args) => commands::check::execute(args, &app),
        Commands::Methods(args) => commands::methods::execute(args, &app),
        Commands::Language(args) => commands::language::execute(args, &app),
        Commands::Config(args) => commands::config::execute(args, &app),
    }
}
