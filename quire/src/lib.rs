//! Expose Quire's internal API for use in testing. The command line is the
//! supported interface; this crate face exists so integration tests can drive
//! the commands and the post index directly.
pub mod cli;
pub mod commands;
pub mod page;
pub mod posts;
