//! Subcommands pertaining to local repository configuration.

mod init;
pub use init::InitCmd;
