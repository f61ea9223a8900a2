use clap::Parser;

use equipment_report::cli::{Cli, Commands};
use equipment_report::commands::{
    run_compose, run_history, run_init, run_report, run_show, run_summarize, run_upload,
};
use equipment_report::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let exit_code = match &cli.command {
        Commands::Summarize(args) => run_summarize(args),
        Commands::Upload(args) => run_upload(args, &cli),
        Commands::History(args) => run_history(args, &cli),
        Commands::Show(args) => run_show(args, &cli),
        Commands::Report(args) => run_report(args, &cli),
        Commands::Compose(args) => run_compose(args, &cli),
        Commands::Init(args) => run_init(args),
    };

    std::process::exit(exit_code);
}
