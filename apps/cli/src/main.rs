use std::process::ExitCode;

use clap::Parser;

use snapdeck_cli::{init_tracing, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(&cli) {
        Ok(report) => {
            println!(
                "conversion complete, packaged to {}",
                report.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
