//! Pattern detection for expectation strings.
//!
//! Expected values arrive as plain YAML scalars; these predicates decide how
//! a string expectation is interpreted before any matching happens: as a
//! regular expression, as a numeric range, or as an array-selector key. Each
//! heuristic is a named predicate so its trigger list stays visible and
//! testable on its own.

use regex::Regex;
use std::sync::OnceLock;

/// Regex for the comparator-range grammar: one or more comma-separated
/// conditions like `>= 10` or `< 99.5, > -3`.
static RANGE_GRAMMAR: OnceLock<Regex> = OnceLock::new();

fn range_grammar() -> &'static Regex {
    RANGE_GRAMMAR.get_or_init(|| {
        Regex::new(r"^(>=|<=|>|<)\s*-?\d+(\.\d+)?(,\s*(>=|<=|>|<)\s*-?\d+(\.\d+)?)*$")
            .expect("range grammar regex is valid")
    })
}

/// Decide whether an expected string should be treated as a regular
/// expression.
///
/// This is a heuristic, not a syntax check: anchors (`^`, `$`) and the
/// metacharacters `\d`, `\w`, `\s`, `[`, `*`, `+`, `?` trigger it. It
/// knowingly over-triggers on strings that use those characters for other
/// purposes (a literal `file*.txt` is matched as a regex). Plain words and
/// punctuation-only strings such as `92998-3874` are not regex patterns.
pub fn is_regex_pattern(s: &str) -> bool {
    s.starts_with('^')
        || s.ends_with('$')
        || s.contains("\\d")
        || s.contains("\\w")
        || s.contains("\\s")
        || s.contains('[')
        || s.contains('*')
        || s.contains('+')
        || s.contains('?')
}

/// Decide whether an expected string is a comparator range pattern.
///
/// Recognizes `(>=|<=|>|<) NUMBER` conditions, comma-separated, where NUMBER
/// may carry a sign and decimals. A bare number is not a range pattern. The
/// hyphen form `MIN-MAX` is only understood where the range matcher is
/// applied directly (response times), never through this classifier.
pub fn is_range_pattern(s: &str) -> bool {
    range_grammar().is_match(s.trim())
}

/// Decide whether an object key addresses into an array.
///
/// Selector keys are bracketed expressions (`[2]`, `[-1]`, `[*]`), the bare
/// wildcard `*`, or a `slice(start[,end])` call.
pub fn is_array_selector(key: &str) -> bool {
    (key.starts_with('[') && key.ends_with(']')) || key == "*" || key.starts_with("slice(")
}
