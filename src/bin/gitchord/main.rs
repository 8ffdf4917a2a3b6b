mod dispatch;
mod list;

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use gitchord::load_registry;

#[derive(Parser, Debug)]
#[command(
    name = "gitchord",
    version,
    about = "Expand short key chords into sequences of git commands"
)]
struct Cli {
    /// Keys to run, e.g. `acp`, followed by the arguments handed in order to
    /// the keys that take one. Flags must come before the keys; everything
    /// after them is an argument. Omit to run the default chord.
    #[arg(trailing_var_arg = true, value_name = "CHORD [ARGS]")]
    words: Vec<String>,

    /// Path to config file (auto-detected if not specified)
    #[arg(short, long)]
    config: Option<String>,

    /// Log file path (mirrors everything written to stderr)
    #[arg(long)]
    log_file: Option<String>,

    /// Print the resolved command lines without running them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// List every key and exit
    #[arg(short, long)]
    list: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        LevelFilter::Warn
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    gitchord::logger::init(filter, log_file)?;

    let (registry, _) = load_registry(cli.config.as_deref())?;

    if cli.list {
        return Ok(list::run(&registry));
    }

    let mut words = cli.words.into_iter();
    let args = dispatch::DispatchArgs {
        chord: words.next().unwrap_or_default(),
        args: words.collect(),
        dry_run: cli.dry_run,
    };
    dispatch::run(args, &registry)
}
