//! The CLI for `st`.

use crate::{
    config::StConfig, ctx::StContext, errors::StError, git::active_repository,
    subcommands::Subcommands,
};
use anyhow::{anyhow, Result};
use clap::{
    builder::styling::{AnsiColor, Color, Style},
    ArgAction, Parser,
};
use tracing::Level;

const ABOUT: &str = "st is a CLI application for making stacked PRs easy to work with.";

/// The CLI application for `st`.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
#[command(about = ABOUT, version, styles = cli_styles())]
pub struct Cli {
    /// Verbosity level (0-4)
    #[arg(short, action = ArgAction::Count)]
    pub v: u8,
    /// The subcommand to run
    #[clap(subcommand)]
    pub subcommand: Subcommands,
}

impl Cli {
    /// Run the CLI application with the given arguments.
    pub fn run(self) -> Result<()> {
        let cli = self.init_tracing_subscriber()?;

        let repo = active_repository().ok_or(StError::NotAGitRepository)?;
        let config = StConfig::load()?;
        let ctx = StContext::new(&repo, config);

        cli.subcommand.run(ctx)?;
        Ok(())
    }

    /// Initializes the tracing subscriber
    ///
    /// # Returns
    /// - `Result<()>` - Ok if successful, Err otherwise.
    pub(crate) fn init_tracing_subscriber(self) -> Result<Self> {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(match self.v {
                0 => Level::ERROR,
                1 => Level::WARN,
                2 => Level::INFO,
                3 => Level::DEBUG,
                _ => Level::TRACE,
            })
            .finish();

        tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))?;

        Ok(self)
    }
}

/// Styles for the CLI application.
const fn cli_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

#[cfg(test)]
mod test {
    use super::Cli;
    use crate::subcommands::Subcommands;
    use clap::Parser;

    #[test]
    fn parses_verbosity_and_subcommand() {
        let cli = Cli::try_parse_from(["st", "-vv", "tidy", "--dry-run"]).unwrap();
        assert_eq!(cli.v, 2);
        assert!(matches!(cli.subcommand, Subcommands::Tidy(_)));
    }

    #[test]
    fn tidy_takes_no_positional_arguments() {
        assert!(Cli::try_parse_from(["st", "tidy", "extra"]).is_err());
    }

    #[test]
    fn log_aliases() {
        let cli = Cli::try_parse_from(["st", "ls"]).unwrap();
        assert!(matches!(cli.subcommand, Subcommands::Log(_)));
    }
}
