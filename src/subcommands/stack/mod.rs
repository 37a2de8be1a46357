//! Subcommands pertaining to stack management.

mod log;
pub use log::LogCmd;

mod track;
pub use track::TrackCmd;

mod tidy;
pub use tidy::TidyCmd;
