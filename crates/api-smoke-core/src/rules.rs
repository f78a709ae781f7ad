// crates/api-smoke-core/src/rules.rs
// ============================================================================
// Module: Body Rules
// Description: Literal checks over parsed JSON response bodies.
// Purpose: Name the missing or invalid field when a response breaks its contract.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each [`BodyRule`] is one literal check taken from an endpoint's documented
//! response shape. Fields are addressed with dotted paths (`error.code`);
//! numeric segments index into arrays. A failing rule returns a [`Violation`]
//! naming the field it looked at.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Field-level contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted field path, `$` for the document root.
    pub field: String,
    /// What was wrong with it.
    pub detail: String,
}

impl Violation {
    /// Creates a violation for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.field, self.detail)
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Literal predicate over a parsed JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BodyRule {
    /// Body is a JSON object.
    IsObject,
    /// Body is a JSON array.
    IsArray,
    /// Body is a JSON object with at least one key.
    NonEmptyObject,
    /// Field is present.
    HasField {
        /// Dotted field path.
        field: String,
    },
    /// At least one of the fields is present.
    HasAnyField {
        /// Candidate field paths.
        fields: Vec<String>,
    },
    /// Field is present and equals `value`.
    FieldEquals {
        /// Dotted field path.
        field: String,
        /// Expected value.
        value: Value,
    },
    /// Field is present and is an array.
    FieldIsArray {
        /// Dotted field path.
        field: String,
    },
    /// The first non-empty string field among `fields` contains every needle.
    LinkContains {
        /// Candidate link fields in priority order.
        fields: Vec<String>,
        /// Substrings the link must contain.
        needles: Vec<String>,
        /// Compare ASCII case-insensitively.
        case_insensitive: bool,
    },
    /// Field text mentions `needle`, ignoring ASCII case.
    FieldMentions {
        /// Dotted field path.
        field: String,
        /// Substring to look for.
        needle: String,
    },
    /// Every rule holds.
    AllOf {
        /// Rules checked in order.
        rules: Vec<BodyRule>,
    },
    /// At least one rule holds.
    AnyOf {
        /// Alternatives checked in order.
        rules: Vec<BodyRule>,
    },
}

impl BodyRule {
    /// Field must be present.
    #[must_use]
    pub fn has_field(field: &str) -> Self {
        Self::HasField {
            field: field.to_string(),
        }
    }

    /// One of the fields must be present.
    #[must_use]
    pub fn has_any_field(fields: &[&str]) -> Self {
        Self::HasAnyField {
            fields: fields.iter().map(ToString::to_string).collect(),
        }
    }

    /// Field must equal `value`.
    #[must_use]
    pub fn field_equals(field: &str, value: Value) -> Self {
        Self::FieldEquals {
            field: field.to_string(),
            value,
        }
    }

    /// Field must be an array.
    #[must_use]
    pub fn field_is_array(field: &str) -> Self {
        Self::FieldIsArray {
            field: field.to_string(),
        }
    }

    /// Link found in one of `fields` must contain every needle.
    #[must_use]
    pub fn link_contains(fields: &[&str], needles: Vec<String>, case_insensitive: bool) -> Self {
        Self::LinkContains {
            fields: fields.iter().map(ToString::to_string).collect(),
            needles,
            case_insensitive,
        }
    }

    /// Field text must mention `needle`.
    #[must_use]
    pub fn field_mentions(field: &str, needle: &str) -> Self {
        Self::FieldMentions {
            field: field.to_string(),
            needle: needle.to_string(),
        }
    }

    /// Every rule must hold.
    #[must_use]
    pub const fn all_of(rules: Vec<Self>) -> Self {
        Self::AllOf {
            rules,
        }
    }

    /// Any rule may hold.
    #[must_use]
    pub const fn any_of(rules: Vec<Self>) -> Self {
        Self::AnyOf {
            rules,
        }
    }

    /// Evaluates the rule against a parsed body.
    ///
    /// # Errors
    ///
    /// Returns a [`Violation`] naming the field that broke the rule.
    pub fn evaluate(&self, body: &Value) -> Result<(), Violation> {
        match self {
            Self::IsObject => expect_kind(body, Value::is_object, "an object"),
            Self::IsArray => expect_kind(body, Value::is_array, "an array"),
            Self::NonEmptyObject => match body {
                Value::Object(map) if map.is_empty() => {
                    Err(Violation::new("$", "expected a non-empty object, got an empty object"))
                }
                Value::Object(_) => Ok(()),
                other => Err(Violation::new(
                    "$",
                    format!("expected a non-empty object, got {}", kind_of(other)),
                )),
            },
            Self::HasField {
                field,
            } => lookup(body, field)
                .map(|_| ())
                .ok_or_else(|| Violation::new(field, "missing required field")),
            Self::HasAnyField {
                fields,
            } => {
                if fields.iter().any(|field| lookup(body, field).is_some()) {
                    Ok(())
                } else {
                    Err(Violation::new(fields.join(" | "), "none of the fields is present"))
                }
            }
            Self::FieldEquals {
                field,
                value,
            } => match lookup(body, field) {
                None => Err(Violation::new(field, "missing required field")),
                Some(actual) if actual == value => Ok(()),
                Some(actual) => {
                    Err(Violation::new(field, format!("expected {value}, got {actual}")))
                }
            },
            Self::FieldIsArray {
                field,
            } => match lookup(body, field) {
                None => Err(Violation::new(field, "missing required field")),
                Some(Value::Array(_)) => Ok(()),
                Some(other) => Err(Violation::new(
                    field,
                    format!("expected an array, got {}", kind_of(other)),
                )),
            },
            Self::LinkContains {
                fields,
                needles,
                case_insensitive,
            } => link_contains(body, fields, needles, *case_insensitive),
            Self::FieldMentions {
                field,
                needle,
            } => {
                let Some(value) = lookup(body, field) else {
                    return Err(Violation::new(field, "missing required field"));
                };
                let text = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                if text.to_ascii_lowercase().contains(&needle.to_ascii_lowercase()) {
                    Ok(())
                } else {
                    Err(Violation::new(field, format!("`{text}` does not mention `{needle}`")))
                }
            }
            Self::AllOf {
                rules,
            } => rules.iter().try_for_each(|rule| rule.evaluate(body)),
            Self::AnyOf {
                rules,
            } => any_of(body, rules),
        }
    }
}

impl fmt::Display for BodyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsObject => f.write_str("is an object"),
            Self::IsArray => f.write_str("is an array"),
            Self::NonEmptyObject => f.write_str("is a non-empty object"),
            Self::HasField {
                field,
            } => write!(f, "has `{field}`"),
            Self::HasAnyField {
                fields,
            } => write!(f, "has one of `{}`", fields.join("`, `")),
            Self::FieldEquals {
                field,
                value,
            } => write!(f, "`{field}` = {value}"),
            Self::FieldIsArray {
                field,
            } => write!(f, "`{field}` is an array"),
            Self::LinkContains {
                fields,
                needles,
                ..
            } => write!(f, "link in `{}` contains {}", fields.join("` | `"), needles.join(", ")),
            Self::FieldMentions {
                field,
                needle,
            } => write!(f, "`{field}` mentions `{needle}`"),
            Self::AllOf {
                rules,
            } => write_joined(f, rules, " and "),
            Self::AnyOf {
                rules,
            } => write_joined(f, rules, " or "),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves a dotted path against a JSON value.
fn lookup<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(body);
    }
    path.split('.').try_fold(body, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Names the JSON kind of a value for diagnostics.
const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Checks the root value kind.
fn expect_kind(body: &Value, check: fn(&Value) -> bool, expected: &str) -> Result<(), Violation> {
    if check(body) {
        Ok(())
    } else {
        Err(Violation::new("$", format!("expected {expected}, got {}", kind_of(body))))
    }
}

/// Evaluates [`BodyRule::LinkContains`].
fn link_contains(
    body: &Value,
    fields: &[String],
    needles: &[String],
    case_insensitive: bool,
) -> Result<(), Violation> {
    let Some((field, link)) = fields.iter().find_map(|field| {
        lookup(body, field)
            .and_then(Value::as_str)
            .filter(|link| !link.is_empty())
            .map(|link| (field, link))
    }) else {
        return Err(Violation::new(fields.join(" | "), "no link field is present"));
    };
    let haystack = if case_insensitive { link.to_ascii_lowercase() } else { link.to_string() };
    for needle in needles {
        let wanted = if case_insensitive { needle.to_ascii_lowercase() } else { needle.clone() };
        if !haystack.contains(&wanted) {
            return Err(Violation::new(field, format!("link `{link}` is missing `{needle}`")));
        }
    }
    Ok(())
}

/// Evaluates [`BodyRule::AnyOf`], collecting every alternative's failure.
fn any_of(body: &Value, rules: &[BodyRule]) -> Result<(), Violation> {
    let mut failures = Vec::with_capacity(rules.len());
    for rule in rules {
        match rule.evaluate(body) {
            Ok(()) => return Ok(()),
            Err(violation) => failures.push(violation),
        }
    }
    if failures.is_empty() {
        return Err(Violation::new("$", "no alternatives declared"));
    }
    let field = failures
        .iter()
        .map(|failure| failure.field.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    let detail = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(Violation::new(field, format!("no alternative matched ({detail})")))
}

/// Writes rules joined by a separator.
fn write_joined(f: &mut fmt::Formatter<'_>, rules: &[BodyRule], separator: &str) -> fmt::Result {
    for (index, rule) in rules.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "({rule})")?;
    }
    Ok(())
}
