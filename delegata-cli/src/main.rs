//! delegata command-line entry point

use clap::Parser;
use delegata_cli::Cli;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    if let Err(e) = cli.run(&mut stdout) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
