//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
mod parsers;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use cli::{Cli, Command, ServeArgs, WatchArgs};

pub(crate) use parsers::{parse_duration_arg, parse_listen_addr};
