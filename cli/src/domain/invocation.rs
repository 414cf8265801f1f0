//! Argument classification and application expansion.
//!
//! Turns the raw tokens of a forwarded command into head flags, an untouched
//! prefix (the verb and anything up to the last flag), resolved services and
//! passthrough arguments. Pure functions only: no I/O.

use crate::domain::catalog::Catalog;
use crate::domain::settings::ComposeTarget;

/// Leading character of a flag token.
pub const FLAG_MARKER: char = '-';

/// Result of classifying one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Flag tokens found before the first non-flag token, in order.
    pub flags: Vec<String>,
    /// Tokens left untouched by trailing classification, starting at the verb.
    pub prefix: Vec<String>,
    /// Known services resolved from trailing tokens, first-seen order, no duplicates.
    pub services: Vec<String>,
    /// Unrecognised trailing tokens in reverse-encounter order.
    pub passthrough: Vec<String>,
    /// Applications whose dependencies are all undeclared. Not forwarded.
    pub dropped_aliases: Vec<String>,
}

fn is_flag(token: &str) -> bool {
    token.starts_with(FLAG_MARKER)
}

/// Classify `tokens` (the invocation minus the program name) against `catalog`.
///
/// Head flags are taken first. Then trailing tokens are consumed from the end
/// while more than one token remains and the last one is not a flag. A token
/// that resolves to known services contributes them; one that resolves to
/// nothing becomes passthrough, unless it names an application, in which case
/// it is recorded in `dropped_aliases`.
#[must_use]
pub fn classify<S: AsRef<str>>(tokens: &[S], catalog: &Catalog) -> Invocation {
    let head = tokens
        .iter()
        .position(|t| !is_flag(t.as_ref()))
        .unwrap_or(tokens.len());
    let (flags, rest) = tokens.split_at(head);

    let mut invocation = Invocation {
        flags: flags.iter().map(|t| t.as_ref().to_owned()).collect(),
        ..Invocation::default()
    };

    let mut end = rest.len();
    while end > 1 && !is_flag(rest[end - 1].as_ref()) {
        end -= 1;
        invocation.absorb(rest[end].as_ref(), catalog);
    }
    invocation.prefix = rest[..end].iter().map(|t| t.as_ref().to_owned()).collect();
    invocation
}

impl Invocation {
    fn absorb(&mut self, token: &str, catalog: &Catalog) {
        let resolved = catalog.resolve(token);
        if resolved.is_empty() {
            if catalog.aliases.contains(token) {
                self.dropped_aliases.push(token.to_owned());
            } else {
                self.passthrough.push(token.to_owned());
            }
            return;
        }
        for name in resolved {
            if !self.services.iter().any(|s| s == name) {
                self.services.push(name.to_owned());
            }
        }
    }

    /// The command verb, e.g. `up` or `logs`.
    #[must_use]
    pub fn verb(&self) -> Option<&str> {
        self.prefix.first().map(String::as_str)
    }

    /// Passthrough arguments restored to their original order.
    pub fn passthrough_in_order(&self) -> impl Iterator<Item = &str> {
        self.passthrough.iter().rev().map(String::as_str)
    }

    /// `up` without `-d`/`--detach`: the tool stays attached until interrupted.
    #[must_use]
    pub fn is_foreground_up(&self) -> bool {
        self.verb() == Some("up")
            && !self
                .flags
                .iter()
                .chain(&self.prefix)
                .any(|t| t == "-d" || t == "--detach")
    }

    /// Arguments for the orchestration tool, program excluded:
    /// `<leading> -f <config> <flags> <prefix> <services> <passthrough>`.
    #[must_use]
    pub fn compose_args(&self, target: &ComposeTarget) -> Vec<String> {
        let mut args = target.base_args();
        args.extend(self.flags.iter().cloned());
        args.extend(self.prefix.iter().cloned());
        args.extend(self.services.iter().cloned());
        args.extend(self.passthrough_in_order().map(str::to_owned));
        args
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
