use clap::Parser;

mod cli;
mod platform;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = platform::run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
