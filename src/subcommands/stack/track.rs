//! `track` subcommand.

use crate::{
    ctx::StContext,
    errors::{StError, StResult},
    git::RepositoryExt,
    graph::{Branch, BranchGraph, BranchState},
    store::{Store, Transaction},
};
use clap::Args;
use git2::Repository;
use nu_ansi_term::Color;

/// CLI arguments for the `track` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct TrackCmd {
    /// Name of the branch to track. Defaults to the checked out branch.
    #[clap(index = 1)]
    branch_name: Option<String>,
    /// Name of the parent branch. Prompted for if omitted.
    #[clap(long, short)]
    parent: Option<String>,
}

impl TrackCmd {
    /// Run the `track` subcommand.
    pub fn run(self, ctx: StContext<'_>) -> StResult<()> {
        let branch_name = match self.branch_name {
            Some(name) => name,
            None => ctx.repository.current_branch_name()?,
        };

        let mut tx = ctx.store.write_tx()?;
        let graph = BranchGraph::load_snapshot(&tx);
        check_trackable(&graph, ctx.repository, &branch_name)?;

        // Prompt the user for the parent if it was not passed.
        let parent_name = match self.parent {
            Some(name) => name,
            None => {
                let candidates = graph
                    .display_branches(Some(branch_name.as_str()))?
                    .into_iter()
                    .filter(|d| d.branch_name != branch_name)
                    .collect::<Vec<_>>();
                let prompt = format!("Select the parent of `{}`", Color::Blue.paint(&branch_name));
                inquire::Select::new(prompt.as_str(), candidates)
                    .with_formatter(&|f| f.value.branch_name.clone())
                    .prompt()?
                    .branch_name
            }
        };

        tx.set_branch(tracked_branch(&graph, &branch_name, &parent_name)?)?;
        tx.commit()?;

        println!(
            "Tracked branch `{}` on top of `{}`.",
            Color::Blue.paint(&branch_name),
            Color::Blue.paint(&parent_name)
        );
        Ok(())
    }
}

/// Checks that `branch_name` is a local branch other than the trunk.
fn check_trackable(graph: &BranchGraph, repository: &Repository, branch_name: &str) -> StResult<()> {
    if branch_name == graph.trunk_name {
        Err(StError::CannotTrackTrunk)
    } else if !repository.branch_exists(branch_name) {
        Err(StError::BranchNotFound(branch_name.to_string()))
    } else {
        Ok(())
    }
}

/// Builds the record for `branch_name` on top of `parent_name`.
///
/// An already tracked branch keeps its other fields and only has its parent replaced.
///
/// ## Returns
/// - `Ok(Branch)` - The record to stage.
/// - `Err(StError::BranchNotTracked)` - The parent is neither the trunk nor tracked.
/// - `Err(StError::Cycle)` - The parent descends from `branch_name`.
fn tracked_branch(graph: &BranchGraph, branch_name: &str, parent_name: &str) -> StResult<Branch> {
    let parent = graph.state_for(parent_name);
    if let BranchState::Ref(ref name) = parent {
        if !graph.contains(name) {
            return Err(StError::BranchNotTracked(name.clone()));
        }
    }
    if graph.would_cycle(branch_name, &parent) {
        return Err(StError::Cycle(branch_name.to_string()));
    }

    let mut branch = graph
        .get(branch_name)
        .cloned()
        .unwrap_or_else(|| Branch::new(branch_name, BranchState::Trunk));
    branch.parent = parent;
    Ok(branch)
}
