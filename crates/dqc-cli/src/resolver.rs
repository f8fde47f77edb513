//! Interactive stdin resolver for ambiguous acquisition matches.

use std::io::{self, BufRead, Write};

use dqc_match::{MatchPrompt, Resolution, Resolver};

/// Prompts on stderr and reads decisions from stdin.
///
/// Empty input or `y` accepts the proposal, `n` declines, anything else
/// is taken as a reference name override.
#[derive(Debug, Default)]
pub struct StdinResolver;

impl StdinResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for StdinResolver {
    fn resolve(&mut self, prompt: &MatchPrompt) -> Resolution {
        match prompt.suggested.as_deref() {
            Some(reference) => {
                let score = prompt
                    .score
                    .map_or_else(String::new, |s| format!(" (difference {s})"));
                eprintln!("acquisition '{}': suggested '{reference}'{score}", prompt.input);
            }
            None => eprintln!("acquisition '{}': no reference suggested", prompt.input),
        }
        eprintln!("  candidates: {}", prompt.candidates.join(", "));
        eprint!("  [enter]=accept, n=skip, or type a reference name: ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return Resolution::Decline;
        }
        parse_decision(&line)
    }
}

fn parse_decision(line: &str) -> Resolution {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("y") {
        Resolution::Accept
    } else if trimmed.eq_ignore_ascii_case("n") {
        Resolution::Decline
    } else {
        Resolution::Override(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_parse_from_input_lines() {
        assert_eq!(parse_decision("\n"), Resolution::Accept);
        assert_eq!(parse_decision("y\n"), Resolution::Accept);
        assert_eq!(parse_decision("n\n"), Resolution::Decline);
        assert_eq!(
            parse_decision("T1_MPR\n"),
            Resolution::Override("T1_MPR".to_string())
        );
    }
}
