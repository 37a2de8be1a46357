//! `log` subcommand.

use crate::{ctx::StContext, errors::StResult, git::RepositoryExt};
use clap::Args;

/// CLI arguments for the `log` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct LogCmd;

impl LogCmd {
    /// Run the `log` subcommand.
    pub fn run(self, ctx: StContext<'_>) -> StResult<()> {
        let graph = ctx.graph()?;
        let checked_out = ctx.repository.current_branch_name().ok();

        let mut buf = String::new();
        graph.write_tree(&mut buf, checked_out.as_deref())?;
        print!("{}", buf);

        Ok(())
    }
}
