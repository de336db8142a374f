mod cli;
mod hit;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Command::Inspect { description } => run::run_inspect(&description),
        Command::Style => run::run_style(&run::resolve(&cli.input)?),
        Command::Stops { json } => run::run_stops(&run::resolve(&cli.input)?, json),
        Command::Simulate(args) => run::run_simulate(&run::resolve(&cli.input)?, &args),
        Command::Html => run::run_html(&run::resolve(&cli.input)?),
        Command::Pick { fraction } => run::run_pick(&run::resolve(&cli.input)?, fraction),
    }
}
