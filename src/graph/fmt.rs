//! Contains the formatting logic for the [BranchGraph] struct.

use super::{BranchGraph, BranchState};
use crate::{
    constants::{
        BOTTOM_LEFT_BOX, COLORS, EMPTY_CIRCLE, FILLED_CIRCLE, HORIZONTAL_BOX, LEFT_FORK_BOX,
        VERTICAL_BOX,
    },
    errors::{StError, StResult},
};
use nu_ansi_term::Color;
use std::fmt::{Display, Write};

impl BranchGraph {
    /// Returns the trunk followed by every tracked branch, parents before children.
    pub fn branches_in_order(&self) -> Vec<String> {
        let mut names = vec![self.trunk_name.clone()];
        self.roots().for_each(|root| {
            names.push(root.name.clone());
            self.fill_branches(&BranchState::Ref(root.name.clone()), &mut names);
        });
        names
    }

    fn fill_branches(&self, parent: &BranchState, names: &mut Vec<String>) {
        self.children(parent).for_each(|child| {
            names.push(child.name.clone());
            self.fill_branches(&BranchState::Ref(child.name.clone()), names);
        });
    }

    /// Gathers an in-order list of [DisplayBranch]es, containing the log-line and branch name.
    ///
    /// This function is particularly useful when creating prompts with [inquire::Select].
    pub fn display_branches(&self, checked_out: Option<&str>) -> StResult<Vec<DisplayBranch>> {
        let mut buf = String::new();
        self.write_tree(&mut buf, checked_out)?;

        let branches = self.branches_in_order();
        let log_lines = buf.trim_end().lines().collect::<Vec<_>>();

        debug_assert_eq!(branches.len(), log_lines.len());
        Ok(branches
            .into_iter()
            .zip(log_lines)
            .map(|(branch_name, log_line)| DisplayBranch {
                display_value: log_line.to_string(),
                branch_name,
            })
            .collect())
    }

    /// Writes the tree of branches, rooted at the trunk, to the given [Write]r.
    ///
    /// ## Takes
    /// - `w` - The writer to write the tree to.
    /// - `checked_out` - The name of the checked out branch, highlighted if present.
    ///
    /// ## Returns
    /// - `Ok(())` - The tree was written.
    /// - `Err(_)` - The graph is inconsistent, or writing failed.
    pub fn write_tree<W: Write>(&self, w: &mut W, checked_out: Option<&str>) -> StResult<()> {
        self.validate()?;

        let trunk = self.trunk_name.clone();
        self.write_tree_recursive(
            w,
            &trunk,
            &BranchState::Trunk,
            checked_out.unwrap_or_default(),
            0,
            "",
            "",
            true,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn write_tree_recursive<W: Write>(
        &self,
        w: &mut W,
        branch: &str,
        state: &BranchState,
        checked_out: &str,
        depth: usize,
        prefix: &str,
        connection: &str,
        is_parent_last_child: bool,
    ) -> StResult<()> {
        // Highlight the checked out branch.
        let checked_out_icon = if branch == checked_out {
            FILLED_CIRCLE
        } else {
            EMPTY_CIRCLE
        };
        let rendered_branch = COLORS[depth % COLORS.len()]
            .paint(format!("{}{} {}", connection, checked_out_icon, branch));

        // Annotate branches that have already been merged.
        let merged = match state {
            BranchState::Trunk => false,
            BranchState::Ref(name) => self
                .get(name)
                .ok_or_else(|| StError::BranchNotTracked(name.clone()))?
                .is_merged(),
        };
        let annotation = if merged {
            format!(" {}", Color::Purple.italic().paint("(merged)"))
        } else {
            String::new()
        };

        // Write the current branch.
        writeln!(w, "{}{}{}", prefix, rendered_branch, annotation)?;

        let mut children = self.children(state).peekable();
        while let Some(child) = children.next() {
            let is_last_child = children.peek().is_none();

            // Form the connection to the child.
            let connection = format!(
                "{}{}",
                if is_last_child {
                    BOTTOM_LEFT_BOX
                } else {
                    LEFT_FORK_BOX
                },
                HORIZONTAL_BOX
            );

            // Extend the prefix, continuing the parent's vertical line if it has more children.
            let prefix = if depth > 0 {
                if is_parent_last_child {
                    format!("{}  ", prefix)
                } else {
                    let color = COLORS[depth % COLORS.len()];
                    format!("{}{} ", prefix, color.paint(VERTICAL_BOX.to_string()))
                }
            } else {
                prefix.to_string()
            };

            // Write the child and its descendants.
            self.write_tree_recursive(
                w,
                &child.name,
                &BranchState::Ref(child.name.clone()),
                checked_out,
                depth + 1,
                &prefix,
                &connection,
                is_last_child,
            )?;
        }

        Ok(())
    }
}

/// A pair of a log-line and a branch name, which implements [Display].
#[derive(Debug)]
pub struct DisplayBranch {
    /// The log-line to display.
    pub(crate) display_value: String,
    /// The branch name corresponding to the log-line.
    pub(crate) branch_name: String,
}

impl Display for DisplayBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_value)
    }
}
