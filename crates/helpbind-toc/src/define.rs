//! Registration-call unwrapping with staged tolerance.
//!
//! A definition document is a single `define(...)` call, optionally preceded by arbitrary text
//! (license banners, module prologues). Parsing runs through three stages and stops at the
//! first that succeeds:
//!
//! 1. lenient parse of the `define(...)` argument list,
//! 2. lenient parse of the whole text as a bare value when no call is present,
//! 3. strict JSON parse of the first value inside the call, ignoring trailing text.
//!
//! When every stage fails, the error of the first applicable lenient stage is returned.

use log::debug;
use serde_json::{Deserializer, Value as Json};

use crate::{
    error::ParseError,
    parser::{parse_call, parse_value},
    value::Value,
};

/// The registration call that wraps every definition document.
const CALL: &str = "define";

/// Which stage produced a parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Lenient parse of the registration call.
    Call,
    /// Lenient parse of a bare value.
    Bare,
    /// Strict JSON parse of the call payload.
    Strict,
}

/// Parses a definition document, returning the value and the stage that accepted it.
pub fn parse_definition(text: &str) -> Result<(Value, Stage), ParseError> {
    let Some(open) = find_call(text) else {
        return parse_value(text).map(|value| (value, Stage::Bare));
    };

    let lenient_err = match parse_call(&text[open..], open) {
        Ok(value) => return Ok((value, Stage::Call)),
        Err(err) => err,
    };
    debug!("lenient parse failed ({lenient_err}), trying strict JSON");

    match strict_payload(&text[open..]) {
        Some(json) => Ok((Value::from(json), Stage::Strict)),
        None => Err(lenient_err),
    }
}

/// Returns the byte offset of the `(` that opens the registration call.
fn find_call(text: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(CALL) {
        let start = search_from + found;
        let after = start + CALL.len();
        let preceded_by_ident = text[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        let rest = &text[after..];
        let trimmed = rest.trim_start();
        if !preceded_by_ident && trimmed.starts_with('(') {
            return Some(after + (rest.len() - trimmed.len()));
        }
        search_from = after;
    }
    None
}

/// Reads the first JSON value after the call's opening `(`, ignoring whatever follows it.
fn strict_payload(call: &str) -> Option<Json> {
    Deserializer::from_str(call.get(1..)?)
        .into_iter::<Json>()
        .next()?
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_call() {
        let (value, stage) = parse_definition("define({a: 'x',});").unwrap();
        assert_eq!(stage, Stage::Call);
        assert_eq!(value.get("a").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn leading_text_is_ignored() {
        let text = "/* generated @ 2019 */\nvar x = 1;\ndefine ({n: 1})";
        let (value, stage) = parse_definition(text).unwrap();
        assert_eq!(stage, Stage::Call);
        assert!(value.get("n").is_some());
    }

    #[test]
    fn identifier_containing_define_is_skipped() {
        let text = "redefine(1); define({ok: true})";
        let (value, _) = parse_definition(text).unwrap();
        assert_eq!(value.get("ok"), Some(&Value::Bool(true)));
    }

    #[test]
    fn bare_value_without_call() {
        let (value, stage) = parse_definition("{tree: {n: []}}").unwrap();
        assert_eq!(stage, Stage::Bare);
        assert!(value.get("tree").is_some());
    }

    #[test]
    fn strict_fallback_ignores_trailing_statements() {
        // A trailing statement after the call defeats the lenient stage; the payload is still
        // valid JSON.
        let text = r#"define({"a": "é"}); init();"#;
        let (value, stage) = parse_definition(text).unwrap();
        assert_eq!(stage, Stage::Strict);
        assert_eq!(value.get("a").and_then(Value::as_str), Some("é"));
    }

    #[test]
    fn all_stages_fail() {
        let text = "define({a: })";
        let err = parse_definition(text).unwrap_err();
        assert_eq!(err.position, Some(11));
    }
}
