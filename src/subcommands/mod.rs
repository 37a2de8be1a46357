//! The subcommands for the `st` application.

use crate::{ctx::StContext, errors::StResult};
use clap::Subcommand;

mod local;
pub use local::InitCmd;

mod stack;
pub use stack::{LogCmd, TidyCmd, TrackCmd};

#[derive(Debug, Clone, Eq, PartialEq, Subcommand)]
pub enum Subcommands {
    /// Configure `st` for the repository by selecting its trunk branch.
    Init(InitCmd),
    /// Track a branch on top of a parent branch.
    #[clap(alias = "t")]
    Track(TrackCmd),
    /// Print a tree of all tracked branches.
    #[clap(aliases = ["l", "ls"])]
    Log(LogCmd),
    /// Tidy stacked branches by removing deleted or merged branches.
    ///
    /// Children of removed branches are re-parented onto their nearest remaining ancestor.
    /// Only `st` metadata is changed; git branches are never deleted.
    Tidy(TidyCmd),
}

impl Subcommands {
    /// Run the subcommand with the given context.
    pub fn run(self, ctx: StContext<'_>) -> StResult<()> {
        match self {
            Self::Init(args) => args.run(ctx),
            Self::Track(args) => args.run(ctx),
            Self::Log(args) => args.run(ctx),
            Self::Tidy(args) => args.run(ctx),
        }
    }
}
