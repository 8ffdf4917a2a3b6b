use log::info;

use crate::chord::ExecutionStep;
use crate::registry::spec::{BRANCH_PLACEHOLDER, MacroSpec};

/// Expand a macro into its steps, replacing `{branch}` with `branch`.
#[must_use]
pub fn expand(spec: &MacroSpec, branch: &str) -> Vec<ExecutionStep> {
    info!("Expanding macro '{}' on branch {branch}", spec.key);
    spec.steps
        .iter()
        .map(|step| {
            let argument = step
                .argument
                .as_deref()
                .map(|argument| argument.replace(BRANCH_PLACEHOLDER, branch))
                .unwrap_or_default();
            ExecutionStep::new(step.key.clone(), argument)
        })
        .collect()
}
