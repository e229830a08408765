mod plan;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::Cli;
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    let (cli, matches) = parse_args()?;

    crate::logger::init_logging(cli.verbose, cli.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(cli, &matches))
}

fn parse_args() -> AppResult<(Cli, ArgMatches)> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    Ok((cli, matches))
}

async fn run_async(cli: Cli, matches: &ArgMatches) -> AppResult<()> {
    let plan = build_plan(cli, matches)?;
    execute_plan(plan).await
}
