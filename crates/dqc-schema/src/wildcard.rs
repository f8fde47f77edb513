use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;

use dqc_model::{DqcError, Result};

static COMPILED: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

/// Compile a wildcard expression to an anchored regular expression.
///
/// `*` matches any sequence, `?` matches any single character, all
/// other characters match literally (case-sensitive). The match is
/// anchored at both ends, so `*T1*` matches any value containing `T1`.
///
/// Compiled expressions are cached for the life of the process, so
/// evaluating the same pattern against many records parses it once.
pub fn compile_wildcard(expression: &str) -> Result<Regex> {
    let cache = COMPILED.get_or_init(|| Mutex::new(HashMap::new()));
    if let Ok(compiled) = cache.lock() {
        if let Some(regex) = compiled.get(expression) {
            return Ok(regex.clone());
        }
    }
    let regex = build_wildcard(expression)?;
    if let Ok(mut compiled) = cache.lock() {
        compiled.insert(expression.to_string(), regex.clone());
    }
    Ok(regex)
}

fn build_wildcard(expression: &str) -> Result<Regex> {
    let mut pattern = String::with_capacity(expression.len() + 2);
    pattern.push('^');
    for ch in expression.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(&ch.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
        .map_err(|e| DqcError::schema(format!("invalid pattern '{expression}': {e}")))
}

/// True when the expression contains wildcard metacharacters.
pub fn is_wildcard(expression: &str) -> bool {
    expression.contains('*') || expression.contains('?')
}
