use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::error::{AppError, AppResult};

use super::Cli;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<(Cli, ArgMatches)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = Cli::command().try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches).map_err(AppError::from)?;
    Ok((cli, matches))
}
