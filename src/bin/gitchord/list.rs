use std::process::ExitCode;

use gitchord::registry::Registry;

/// Print every registered key.
pub fn run(registry: &Registry) -> ExitCode {
    print!("{}", gitchord::listing::render(registry));
    ExitCode::SUCCESS
}
