//! Execution-scope classification and the wrapper each scope gets.

use serde_json::Value;

/// Where in the tag runtime an extension's code executes.
///
/// The three named scopes currently share one wrapper but are kept apart so
/// each can change independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    BeforeLoadRules,
    AfterLoadRules,
    AfterTags,
    /// A tag id, or a comma-joined list of tag ids.
    NumericOrListTarget,
    Unscoped,
}

impl Scope {
    pub const BEFORE_LOAD_RULES: &'static str = "Before Load Rules";
    pub const AFTER_LOAD_RULES: &'static str = "After Load Rules";
    pub const AFTER_TAGS: &'static str = "After Tags";

    /// Classify an extension's raw `scope` field.
    ///
    /// Strings are matched against the named scopes first; anything numeric
    /// or containing a comma targets tags. A non-zero JSON number is a tag
    /// id. Missing, empty, zero and every other shape are unscoped.
    pub fn classify(raw: Option<&Value>) -> Scope {
        match raw {
            Some(Value::String(s)) => Self::classify_str(s),
            Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f != 0.0) => {
                Scope::NumericOrListTarget
            }
            _ => Scope::Unscoped,
        }
    }

    fn classify_str(s: &str) -> Scope {
        match s {
            "" => Scope::Unscoped,
            Self::BEFORE_LOAD_RULES => Scope::BeforeLoadRules,
            Self::AFTER_LOAD_RULES => Scope::AfterLoadRules,
            Self::AFTER_TAGS => Scope::AfterTags,
            other if is_numeric_like(other) || other.contains(',') => Scope::NumericOrListTarget,
            _ => Scope::Unscoped,
        }
    }

    /// Wrap `code` so it runs with the arguments this scope provides.
    pub fn wrap(self, code: &str) -> String {
        match self {
            Scope::BeforeLoadRules => {
                format!("(function(a,b){{\n{code}\n}})(eventType, eventPayload);")
            }
            Scope::AfterLoadRules => {
                format!("(function(a,b){{\n{code}\n}})(eventType, eventPayload);")
            }
            Scope::AfterTags => {
                format!("(function(a,b){{\n{code}\n}})(eventType, eventPayload);")
            }
            Scope::NumericOrListTarget => {
                format!("(function(a,b,u){{\n{code}\n}})(eventType, eventPayload, tagObject);")
            }
            Scope::Unscoped => code.to_string(),
        }
    }
}

/// True when the string converts to a number under JavaScript's `Number()`
/// rules: blank strings, decimal and exponent literals, `0x`/`0o`/`0b`
/// integers and signed `Infinity`.
pub fn is_numeric_like(s: &str) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return true;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }
    }

    let unsigned = t.strip_prefix(&['+', '-'][..]).unwrap_or(t);
    if unsigned == "Infinity" {
        return true;
    }

    // f64::from_str also takes "inf" and "NaN", which Number() does not.
    unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && t.parse::<f64>().is_ok()
}
