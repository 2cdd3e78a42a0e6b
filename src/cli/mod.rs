//! CLI module for lsp-wire
//!
//! Provides command-line interface using clap derive macros.

pub mod commands;
pub mod output;

pub use output::OutputContext;

use clap::{Parser, Subcommand};

use commands::{
    check::CheckArgs, config::ConfigArgs, language::LanguageArgs, methods::MethodsArgs,
};

const LONG_ABOUT: &str = r#"
lsp-wire - Language Server Protocol wire-format checker

Decodes LSP message params with a strict typed model, re-encodes them and
reports whether anything was lost or normalised on the way.

QUICK START:
  lsp-wire methods                                   # Supported methods
  lsp-wire check window/showMessage params.json      # Check a params file
  echo '{"token":1,"value":{"kind":"end"}}' | lsp-wire check '$/progress'
  lsp-wire language tsx                              # Resolve a languageId

CONFIGURATION:
  ~/.config/lsp-wire/config.toml, ./.lsp-wire.toml
  LSP_WIRE_PRETTY, LSP_WIRE_STRICT
"#;

/// lsp-wire - Language Server Protocol wire-format checker
#[derive(Parser, Debug)]
#[command(name = "lsp-wire")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
#[command(after_help = "Use 'lsp-wire <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Single-line JSON output
    #[arg(long, global = true)]
    pub compact: bool,

    /// Verbose output (show debug info)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode params for a method and report the canonical encoding
    Check(CheckArgs),

    /// List supported methods
    Methods(MethodsArgs),

    /// Resolve a filetype or file extension to a language identifier
    Language(LanguageArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_globals() {
        let cli = Cli::parse_from(["lsp-wire", "check", "$/progress", "--compact", "-v"]);
        assert!(cli.compact);
        assert!(cli.verbose);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.method, "$/progress");
                assert!(args.file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
