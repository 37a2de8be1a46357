//! `tidy` subcommand.

use crate::{
    config::StConfig,
    ctx::StContext,
    errors::StResult,
    tidy::{tidy, RefCheckMode, TidyOptions, TidySummary},
};
use clap::Args;
use itertools::Itertools;
use nu_ansi_term::Color;

/// CLI arguments for the `tidy` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct TidyCmd {
    /// Abort if a branch ref cannot be checked, instead of treating the branch as deleted.
    #[arg(long, env = "ST_STRICT_REF_CHECK")]
    strict: bool,
    /// Report what would be tidied without changing anything.
    #[arg(long)]
    dry_run: bool,
}

impl TidyCmd {
    /// Run the `tidy` subcommand.
    pub fn run(self, ctx: StContext<'_>) -> StResult<()> {
        let options = TidyOptions {
            mode: self.mode(&ctx.config),
            dry_run: self.dry_run,
        };

        let summary = tidy(&ctx.store, ctx.repository, options)?;
        eprint!("{}", report(&summary));
        Ok(())
    }

    /// Returns [RefCheckMode::Strict] if either the flag or the user configuration asks for it.
    fn mode(&self, config: &StConfig) -> RefCheckMode {
        if self.strict || config.tidy.strict_ref_check {
            RefCheckMode::Strict
        } else {
            RefCheckMode::Lenient
        }
    }
}

/// Renders the human-readable outcome of a tidy run.
fn report(summary: &TidySummary) -> String {
    let n = summary.tidied();
    if n == 0 {
        return "No branches to tidy.\n".to_string();
    }

    let verb = if summary.committed {
        "Tidied"
    } else {
        "Would tidy"
    };
    let mut out = format!(
        "{} {} {}.\n",
        verb,
        Color::Cyan.bold().paint(n.to_string()),
        pluralize(n, "branch", "branches")
    );

    if !summary.committed {
        out.push_str(&format!(
            "  remove: {}\n",
            summary.removed.iter().map(|b| Color::Blue.paint(b)).join(", ")
        ));
        for reparent in &summary.reparented {
            out.push_str(&format!(
                "  move: {} ({} -> {})\n",
                Color::Blue.paint(&reparent.branch),
                reparent.from,
                reparent.to
            ));
        }
    }
    out
}

fn pluralize<'a>(n: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if n == 1 {
        singular
    } else {
        plural
    }
}
