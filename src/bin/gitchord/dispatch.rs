use std::process::ExitCode;

use log::{debug, error};

use gitchord::branch::GitBranchResolver;
use gitchord::chord::ChordInvocation;
use gitchord::executor::{DryRunner, ProcessRunner};
use gitchord::registry::Registry;
use gitchord::sequencer::Sequencer;

pub struct DispatchArgs {
    pub chord: String,
    pub args: Vec<String>,
    pub dry_run: bool,
}

/// Run a chord against the repository in the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined. Chord
/// failures are logged and reported through the exit code.
pub fn run(
    args: DispatchArgs,
    registry: &Registry,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let invocation = ChordInvocation::new(args.chord, args.args, &GitBranchResolver::new(cwd));

    let result = if args.dry_run {
        Sequencer::new(registry, DryRunner).run(&invocation)
    } else {
        Sequencer::new(registry, ProcessRunner).run(&invocation)
    };

    match result {
        Ok(report) => {
            debug!("Chord finished after {} step(s)", report.executed);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
