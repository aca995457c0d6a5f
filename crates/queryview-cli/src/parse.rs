// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `K=V` argument parsing.

use anyhow::{bail, Result};
use queryview::{Criteria, Value, IN_SUFFIX};

/// Parse `K=V` arguments into criteria, in order.
///
/// `V` is read as JSON when it parses (`7`, `true`, `null`, `"7"`, `[1,2]`),
/// otherwise as a bare string. For `__in` keys a non-JSON-array `V` is split
/// on commas and each piece is read the same way.
pub fn criteria(args: &[String]) -> Result<Criteria> {
    let mut out = Criteria::new();
    for arg in args {
        let Some((key, raw)) = arg.split_once('=') else {
            bail!("expected K=V, got {arg:?}");
        };
        if key.is_empty() {
            bail!("empty field name in {arg:?}");
        }
        let value = if key.ends_with(IN_SUFFIX) {
            match scalar(raw) {
                list @ Value::List(_) => list,
                _ => raw.split(',').map(scalar).collect(),
            }
        } else {
            scalar(raw)
        };
        out.push(key, value);
    }
    Ok(out)
}

fn scalar(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::Str(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn json_scalars_and_bare_strings() {
        let c = criteria(&args(&["id=7", "name=ada", "quoted=\"7\"", "flag=true"])).unwrap();
        let values: Vec<_> = c.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(
            values,
            [
                Value::Int(7),
                Value::from("ada"),
                Value::from("7"),
                Value::Bool(true)
            ]
        );
    }

    #[test]
    fn in_suffix_splits_on_commas() {
        let c = criteria(&args(&["a__in=1,2,x"])).unwrap();
        let (key, value) = c.iter().next().unwrap();
        assert_eq!(key, "a__in");
        assert_eq!(value, &Value::List(vec![Value::Int(1), Value::Int(2), Value::from("x")]));
    }

    #[test]
    fn in_suffix_accepts_json_arrays() {
        let c = criteria(&args(&["a__in=[1,\"b,c\"]"])).unwrap();
        let (_, value) = c.iter().next().unwrap();
        assert_eq!(value, &Value::List(vec![Value::Int(1), Value::from("b,c")]));
    }

    #[test]
    fn value_may_contain_equals() {
        let c = criteria(&args(&["expr=a=b"])).unwrap();
        assert_eq!(c.iter().next().unwrap().1, &Value::from("a=b"));
    }

    #[test]
    fn rejects_malformed() {
        assert!(criteria(&args(&["novalue"])).is_err());
        assert!(criteria(&args(&["=1"])).is_err());
    }
}
