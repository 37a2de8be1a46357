//! `init` subcommand.

use crate::{
    ctx::StContext,
    errors::{StError, StResult},
    git::RepositoryExt,
};
use clap::Args;
use nu_ansi_term::Color;

const SELECT_TRUNK: &str = "Select the trunk branch for the repository.";

/// CLI arguments for the `init` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct InitCmd {
    /// Name of the trunk branch. Prompted for if omitted.
    #[clap(long)]
    trunk: Option<String>,
    /// Reinitialize an existing configuration, forgetting every tracked branch.
    #[clap(long, short)]
    force: bool,
}

impl InitCmd {
    /// Run the `init` subcommand.
    pub fn run(self, ctx: StContext<'_>) -> StResult<()> {
        if ctx.store.is_initialized() && !self.force {
            return Err(StError::StoreAlreadyInitialized);
        }

        let trunk = match self.trunk {
            Some(trunk) => trunk,
            None => {
                let branches = ctx.repository.local_branch_names()?;
                inquire::Select::new(SELECT_TRUNK, branches).prompt()?
            }
        };

        if !ctx.repository.branch_exists(&trunk) {
            return Err(StError::BranchNotFound(trunk));
        }

        ctx.store.initialize(&trunk, self.force)?;

        println!(
            "Configured `st` with trunk branch `{}`.",
            Color::Blue.paint(&trunk)
        );
        Ok(())
    }
}
