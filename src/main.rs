use clap::Parser;
use libwebloc::{cli::Cli, logging};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!(subcommand = ?cli.subcommand, "dispatching");
    cli.run()?;
    Ok(())
}
