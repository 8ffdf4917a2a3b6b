//! Human-readable reference of every registered key.

use std::fmt::Write;

use crate::registry::Registry;
use crate::registry::spec::ArgPolicy;

fn push_entry(out: &mut String, key: &str, line: &str, description: &str) {
    let _ = writeln!(out, "  {key:<4}{line}");
    if !description.is_empty() {
        let _ = writeln!(out, "      {description}");
    }
}

/// Render the key listing printed by `--list`.
#[must_use]
pub fn render(registry: &Registry) -> String {
    let mut out = String::new();
    let vcs = registry.vcs();

    let commands = registry.commands();
    if !commands.is_empty() {
        out.push_str("Commands:\n");
        for spec in commands {
            let policy = match &spec.arg {
                ArgPolicy::None => String::new(),
                ArgPolicy::Required => "  (required)".to_string(),
                ArgPolicy::Optional { default: None } => "  (optional)".to_string(),
                ArgPolicy::Optional {
                    default: Some(default),
                } => format!("  (default: {default})"),
            };
            push_entry(
                &mut out,
                &spec.key.to_string(),
                &format!("{vcs} {}{policy}", spec.template),
                &spec.description,
            );
        }
    }

    let multi = registry.multi_commands();
    if !multi.is_empty() {
        out.push_str("Multi-key commands:\n");
        for spec in multi {
            push_entry(
                &mut out,
                &spec.key,
                &format!("{vcs} {}", spec.args.join(" ")),
                &spec.description,
            );
        }
    }

    let macros = registry.macros();
    if !macros.is_empty() {
        out.push_str("Macros:\n");
        for spec in macros {
            push_entry(
                &mut out,
                &spec.key.to_string(),
                &spec.to_string(),
                &spec.description,
            );
        }
    }

    let _ = writeln!(out, "Empty chord runs: {}", registry.default_chord());
    out
}
