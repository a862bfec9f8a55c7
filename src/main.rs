use basic::mach::Config;
use clap::Parser;
use std::path::PathBuf;

/// Tokenized BASIC with resumable sessions.
#[derive(Debug, Parser)]
#[command(name = "basic", version)]
struct Args {
    /// Program text to load
    program: Option<PathBuf>,
    /// Run the program after loading it
    #[arg(short, long)]
    run: bool,
    /// Command line to execute first
    #[arg(short, long, value_name = "COMMAND")]
    exec: Option<String>,
    /// Continue the session saved in the state file
    #[arg(long)]
    resume: bool,
    /// Quit when idle and no input is waiting
    #[arg(short, long)]
    quit: bool,
    /// Wait for a key before exiting
    #[arg(short, long)]
    wait: bool,
    /// Where to save the session on exit
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,
    /// Default AUTO increment
    #[arg(long, default_value_t = 10)]
    auto_increment: u16,
    /// Skip the greeting
    #[arg(long)]
    no_greeting: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Config {
        Config {
            program: args.program,
            run: args.run,
            exec: args.exec,
            resume: args.resume,
            quit: args.quit,
            wait: args.wait,
            state_file: args.state_file,
            auto_increment: args.auto_increment,
            greeting: !args.no_greeting,
        }
    }
}

fn main() {
    env_logger::init();
    basic::term::main(Args::parse().into());
}
