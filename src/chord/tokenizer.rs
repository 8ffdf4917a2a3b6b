//! Left-to-right chord scanner.
//!
//! At every position the scanner tries, in order: a macro key, a two-key
//! multi command, then a single-key command. A single-key command may be
//! followed by a quoted inline argument; otherwise an argument-taking command
//! pulls the next positional argument.

use log::{debug, warn};

use crate::chord::{ExecutionStep, ParseError, macros};
use crate::registry::Registry;
use crate::registry::spec::QUOTES;

/// Steps produced from one chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    pub steps: Vec<ExecutionStep>,
    /// Number of positional arguments bound to steps
    pub consumed_args: usize,
}

struct Scanner<'a> {
    registry: &'a Registry,
    chars: Vec<char>,
    cursor: usize,
    args: &'a [String],
    next_arg: usize,
    branch: &'a str,
    steps: Vec<ExecutionStep>,
}

impl Scanner<'_> {
    fn run(mut self) -> Result<TokenStream, ParseError> {
        let registry = self.registry;
        while let Some(&c) = self.chars.get(self.cursor) {
            if let Some(spec) = registry.macro_spec(c) {
                self.steps.extend(macros::expand(spec, self.branch));
                self.cursor += 1;
                continue;
            }

            if let Some(&next) = self.chars.get(self.cursor + 1) {
                let pair: String = [c, next].iter().collect();
                if registry.multi(&pair).is_some() {
                    self.steps.push(ExecutionStep::new(pair, ""));
                    self.cursor += 2;
                    continue;
                }
            }

            let Some(spec) = registry.command(c) else {
                return Err(ParseError::UnknownCommand {
                    key: c,
                    position: self.cursor,
                });
            };
            self.cursor += 1;

            let argument = if let Some(quoted) = self.read_quoted() {
                quoted
            } else if spec.arg.takes_positional() && self.next_arg < self.args.len() {
                self.next_arg += 1;
                self.args[self.next_arg - 1].clone()
            } else {
                String::new()
            };
            self.steps.push(ExecutionStep::new(c, argument));
        }

        debug!(
            "Tokenized {} step(s), {} positional argument(s) bound",
            self.steps.len(),
            self.next_arg
        );
        Ok(TokenStream {
            steps: self.steps,
            consumed_args: self.next_arg,
        })
    }

    /// Consume a quoted argument at the cursor, if one starts there. An
    /// unterminated quote runs to the end of the chord.
    fn read_quoted(&mut self) -> Option<String> {
        let quote = self
            .chars
            .get(self.cursor)
            .copied()
            .filter(|c| QUOTES.contains(c))?;
        let start = self.cursor + 1;
        let close = self.chars[start..]
            .iter()
            .position(|&c| c == quote)
            .map(|offset| start + offset);

        let end = close.unwrap_or(self.chars.len());
        let text: String = self.chars[start..end].iter().collect();
        if close.is_none() {
            warn!("Unterminated {quote} in chord, argument runs to the end: {text:?}");
        }
        self.cursor = close.map_or(end, |close| close + 1);
        Some(text)
    }
}

/// Split `chord` into execution steps.
///
/// Positional arguments are handed out strictly in call order to the
/// argument-taking commands that have no inline quoted argument. Macros are
/// expanded in place using `branch`.
///
/// # Errors
///
/// Returns `ParseError::UnknownCommand` for the first character that is not a
/// macro, multi or single-key command. No steps are returned in that case.
pub fn tokenize(
    registry: &Registry,
    chord: &str,
    args: &[String],
    branch: &str,
) -> Result<TokenStream, ParseError> {
    Scanner {
        registry,
        chars: chord.chars().collect(),
        cursor: 0,
        args,
        next_arg: 0,
        branch,
        steps: Vec::new(),
    }
    .run()
}
