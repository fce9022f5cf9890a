//! Visibility predicates.
//!
//! A node may carry a [`Condition`] evaluated against a JSON data context
//! during measurement. Paths are dot-separated (`order.lines.0.qty`); array
//! segments are numeric indices.
//!
//! Evaluation is three-valued: a path that does not resolve, or a comparison
//! between incompatible values, yields `None`. The measure engine treats
//! `None` as "not visible" so a malformed document degrades instead of
//! failing a batch job.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Condition {
    Always,
    Never,
    /// The path resolves to any value, including `null`.
    Exists { path: String },
    /// The path resolves to a truthy value.
    Truthy { path: String },
    Eq { path: String, value: Value },
    Ne { path: String, value: Value },
    Gt { path: String, value: Value },
    Gte { path: String, value: Value },
    Lt { path: String, value: Value },
    Lte { path: String, value: Value },
    Not { condition: Box<Condition> },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
}

#[derive(Clone, Copy)]
enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Condition {
    /// Evaluate against a data context. `None` means unresolvable.
    pub fn evaluate(&self, data: &Value) -> Option<bool> {
        match self {
            Condition::Always => Some(true),
            Condition::Never => Some(false),
            Condition::Exists { path } => Some(lookup(data, path).is_some()),
            Condition::Truthy { path } => lookup(data, path).map(is_truthy),
            Condition::Eq { path, value } => compare(data, path, value, CompareOp::Eq),
            Condition::Ne { path, value } => compare(data, path, value, CompareOp::Ne),
            Condition::Gt { path, value } => compare(data, path, value, CompareOp::Gt),
            Condition::Gte { path, value } => compare(data, path, value, CompareOp::Gte),
            Condition::Lt { path, value } => compare(data, path, value, CompareOp::Lt),
            Condition::Lte { path, value } => compare(data, path, value, CompareOp::Lte),
            Condition::Not { condition } => condition.evaluate(data).map(|b| !b),
            Condition::All { conditions } => {
                let mut result = true;
                for c in conditions {
                    result &= c.evaluate(data)?;
                }
                Some(result)
            }
            Condition::Any { conditions } => {
                let mut result = false;
                for c in conditions {
                    result |= c.evaluate(data)?;
                }
                Some(result)
            }
        }
    }

    /// Evaluate, treating anything unresolvable as false.
    pub fn holds(&self, data: &Value) -> bool {
        self.evaluate(data).unwrap_or(false)
    }
}

/// Traverse a JSON value by a dot-separated path.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn compare(data: &Value, path: &str, expected: &Value, op: CompareOp) -> Option<bool> {
    let actual = lookup(data, path)?;
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => Some(match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Gte => a >= b,
            CompareOp::Lt => a < b,
            CompareOp::Lte => a <= b,
        }),
        _ => match op {
            CompareOp::Eq => Some(actual == expected),
            CompareOp::Ne => Some(actual != expected),
            _ => {
                let (a, b) = (actual.as_str()?, expected.as_str()?);
                Some(match op {
                    CompareOp::Gt => a > b,
                    CompareOp::Gte => a >= b,
                    CompareOp::Lt => a < b,
                    _ => a <= b,
                })
            }
        },
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> Value {
        json!({
            "customer": { "name": "Acme", "vip": true },
            "lines": [ { "qty": 3 }, { "qty": 0 } ],
            "total": 125.5,
            "note": ""
        })
    }

    #[test]
    fn paths_traverse_objects_and_arrays() {
        let d = data();
        assert_eq!(
            Condition::Truthy {
                path: "lines.0.qty".into()
            }
            .evaluate(&d),
            Some(true)
        );
        assert_eq!(
            Condition::Truthy {
                path: "lines.1.qty".into()
            }
            .evaluate(&d),
            Some(false)
        );
        assert_eq!(
            Condition::Exists {
                path: "lines.5".into()
            }
            .evaluate(&d),
            Some(false)
        );
    }

    #[test]
    fn numeric_comparisons() {
        let d = data();
        let gt = Condition::Gt {
            path: "total".into(),
            value: json!(100),
        };
        assert_eq!(gt.evaluate(&d), Some(true));
        let lte = Condition::Lte {
            path: "total".into(),
            value: json!(125.5),
        };
        assert_eq!(lte.evaluate(&d), Some(true));
    }

    #[test]
    fn string_equality() {
        let d = data();
        let eq = Condition::Eq {
            path: "customer.name".into(),
            value: json!("Acme"),
        };
        assert!(eq.holds(&d));
    }

    #[test]
    fn unresolvable_paths_are_not_visible() {
        let d = data();
        let missing = Condition::Eq {
            path: "customer.address.city".into(),
            value: json!("Oslo"),
        };
        assert_eq!(missing.evaluate(&d), None);
        assert!(!missing.holds(&d));

        // Negating an unresolvable condition stays unresolvable.
        let negated = Condition::Not {
            condition: Box::new(missing),
        };
        assert!(!negated.holds(&d));
    }

    #[test]
    fn ordered_comparison_on_mismatched_types_is_unresolvable() {
        let d = data();
        let c = Condition::Gt {
            path: "customer.vip".into(),
            value: json!(1),
        };
        assert_eq!(c.evaluate(&d), None);
    }

    #[test]
    fn combinators() {
        let d = data();
        let all = Condition::All {
            conditions: vec![
                Condition::Truthy {
                    path: "customer.vip".into(),
                },
                Condition::Not {
                    condition: Box::new(Condition::Truthy {
                        path: "note".into(),
                    }),
                },
            ],
        };
        assert!(all.holds(&d));
        let any = Condition::Any {
            conditions: vec![Condition::Never, Condition::Always],
        };
        assert!(any.holds(&d));
    }

    #[test]
    fn condition_from_json() {
        let c: Condition =
            serde_json::from_str(r#"{ "op": "Gte", "path": "total", "value": 10 }"#).unwrap();
        assert!(c.holds(&data()));
    }
}
