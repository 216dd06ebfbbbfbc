//! Flattening of Stellar's JSON rendering of `ScVal`.
//!
//! With `xdrFormat: "json"` the RPC renders each value as a single-key object
//! tagged with its type: `{"symbol":"funded"}`, `{"i128":"1000000"}`,
//! `{"map":[{"key":…,"val":…}]}`. [`plain`] strips the tags:
//!
//! | ScVal                          | Plain JSON                   |
//! |--------------------------------|------------------------------|
//! | `symbol`, `string`, `address`  | string                       |
//! | `bool`                         | bool                         |
//! | `u32`, `i32`                   | number                       |
//! | 64- and 128-bit integers       | decimal string               |
//! | `bytes`                        | lowercase hex string         |
//! | `vec`                          | array                        |
//! | `map` with symbol/string keys  | object                       |
//! | `"void"`                       | null                         |
//!
//! Wide integers stay strings so that no amount is rounded through `f64`.

use serde_json::{Map, Value};

/// Convert one ScVal JSON value. The error names what could not be read.
pub fn plain(scval: &Value) -> Result<Value, String> {
    let (tag, inner) = match scval {
        Value::String(s) if s == "void" => return Ok(Value::Null),
        Value::Object(map) if map.len() == 1 => map
            .iter()
            .next()
            .ok_or_else(|| "empty ScVal object".to_string())?,
        other => return Err(format!("not a tagged ScVal: {other}")),
    };

    match tag.as_str() {
        "symbol" | "string" | "address" => text(tag, inner).map(Value::String),
        "bool" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| format!("bool is {inner}")),
        "u32" | "i32" => inner
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| format!("{tag} is {inner}")),
        "u64" | "i64" | "timepoint" | "duration" | "u128" | "i128" => {
            integer(tag, inner).map(Value::String)
        }
        "bytes" => {
            let hex_str = inner.as_str().ok_or_else(|| format!("bytes is {inner}"))?;
            let bytes = hex::decode(hex_str).map_err(|e| format!("bytes: {e}"))?;
            Ok(Value::String(hex::encode(bytes)))
        }
        "vec" => match inner {
            Value::Array(items) => items
                .iter()
                .map(plain)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Null => Ok(Value::Array(Vec::new())),
            other => Err(format!("vec is {other}")),
        },
        "map" => map(inner).map(Value::Object),
        other => Err(format!("unsupported ScVal type `{other}`")),
    }
}

fn text(tag: &str, inner: &Value) -> Result<String, String> {
    match inner {
        Value::String(s) => Ok(s.clone()),
        // Some renderers nest the strkey one level deeper.
        Value::Object(map) if map.len() == 1 => match map.values().next() {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(format!("{tag} is {inner}")),
        },
        other => Err(format!("{tag} is {other}")),
    }
}

/// Wide integers arrive as decimal strings, plain numbers or `{"hi","lo"}` parts.
fn integer(tag: &str, inner: &Value) -> Result<String, String> {
    match inner {
        Value::String(s) => {
            let valid = if tag.starts_with('u') || tag == "timepoint" || tag == "duration" {
                s.parse::<u128>().is_ok()
            } else {
                s.parse::<i128>().is_ok()
            };
            if valid {
                Ok(s.clone())
            } else {
                Err(format!("{tag} is {s:?}"))
            }
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Value::Object(parts) => {
            let hi = parts.get("hi").ok_or_else(|| format!("{tag} without hi"))?;
            let lo = parts
                .get("lo")
                .and_then(Value::as_u64)
                .ok_or_else(|| format!("{tag} without lo"))?;
            if tag == "i128" {
                let hi = hi.as_i64().ok_or_else(|| format!("i128 hi is {hi}"))?;
                Ok((((hi as i128) << 64) | lo as i128).to_string())
            } else {
                let hi = hi.as_u64().ok_or_else(|| format!("{tag} hi is {hi}"))?;
                Ok((((hi as u128) << 64) | lo as u128).to_string())
            }
        }
        other => Err(format!("{tag} is {other}")),
    }
}

fn map(inner: &Value) -> Result<Map<String, Value>, String> {
    let entries = match inner {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Map::new()),
        other => return Err(format!("map is {other}")),
    };

    let mut out = Map::new();
    for entry in entries {
        let key = entry.get("key").ok_or("map entry without key")?;
        let val = entry.get("val").ok_or("map entry without val")?;
        let Value::String(name) = plain(key)? else {
            return Err(format!("map key {key} is not a symbol"));
        };
        out.insert(name, plain(val)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_scalar_tags() {
        assert_eq!(plain(&json!({"symbol": "funded"})), Ok(json!("funded")));
        assert_eq!(plain(&json!({"address": "GFUNDER"})), Ok(json!("GFUNDER")));
        assert_eq!(plain(&json!({"u32": 5})), Ok(json!(5)));
        assert_eq!(plain(&json!({"bool": true})), Ok(json!(true)));
        assert_eq!(plain(&json!("void")), Ok(Value::Null));
    }

    #[test]
    fn wide_integers_become_decimal_strings() {
        assert_eq!(plain(&json!({"i128": "1000000"})), Ok(json!("1000000")));
        assert_eq!(plain(&json!({"u64": 42})), Ok(json!("42")));
        assert_eq!(
            plain(&json!({"i128": {"hi": 1, "lo": 0}})),
            Ok(json!("18446744073709551616"))
        );
        assert_eq!(plain(&json!({"i128": {"hi": -1, "lo": u64::MAX}})), Ok(json!("-1")));
        assert!(plain(&json!({"i128": "lots"})).is_err());
    }

    #[test]
    fn bytes_are_normalised_hex() {
        assert_eq!(plain(&json!({"bytes": "DEADBEEF"})), Ok(json!("deadbeef")));
        assert_eq!(plain(&json!({"bytes": ""})), Ok(json!("")));
        assert!(plain(&json!({"bytes": "xyz"})).is_err());
    }

    #[test]
    fn struct_map_becomes_object() {
        let value = json!({"map": [
            {"key": {"symbol": "amount"}, "val": {"i128": "1000000"}},
            {"key": {"symbol": "entry"}, "val": {"vec": [{"symbol": "Fund"}]}},
        ]});
        assert_eq!(
            plain(&value),
            Ok(json!({"amount": "1000000", "entry": ["Fund"]}))
        );
    }

    #[test]
    fn rejects_untagged_and_unknown_values() {
        assert!(plain(&json!("funded")).is_err());
        assert!(plain(&json!({"a": 1, "b": 2})).is_err());
        assert!(plain(&json!({"contract_instance": {}})).is_err());
        assert!(plain(&json!({"map": [{"key": {"u32": 1}, "val": {"u32": 2}}]})).is_err());
    }
}
