//! Template filters
//!
//! String and serialization helpers the CSV and package templates rely on,
//! on top of the MiniJinja builtins (`default`, `lower`, `upper`, `join`, ...).

use base64::Engine as _;
use minijinja::{Error, ErrorKind, Value};

fn invalid(err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string())
}

/// Render a value as a YAML block
///
/// Usage: {{ crd_list | toyaml }}
pub fn toyaml(value: Value) -> Result<String, Error> {
    let json: serde_json::Value = serde_json::to_value(&value).map_err(invalid)?;
    let yaml = serde_yaml::to_string(&json).map_err(invalid)?;

    Ok(yaml.trim_start_matches("---\n").trim_end().to_string())
}

/// Render a value as compact JSON
///
/// Usage: {{ additional_args | tojson }}
pub fn tojson(value: Value) -> Result<String, Error> {
    let json: serde_json::Value = serde_json::to_value(&value).map_err(invalid)?;
    serde_json::to_string(&json).map_err(invalid)
}

/// Wrap in double quotes
///
/// Usage: {{ crd.description | quote }}
#[must_use]
pub fn quote(value: Value) -> String {
    let s = value.as_str().map_or_else(|| value.to_string(), str::to_string);
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Wrap in single quotes
#[must_use]
pub fn squote(value: Value) -> String {
    let s = value.as_str().map_or_else(|| value.to_string(), str::to_string);
    format!("'{}'", s.replace('\'', "''"))
}

/// Indent every non-empty line
///
/// Usage: {{ operator_rbac | indent(8) }}
#[must_use]
pub fn indent(value: String, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    value
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Like `indent`, with a leading newline
///
/// Usage: `rules:{{ operator_rbac | nindent(10) }}`
#[must_use]
pub fn nindent(value: String, spaces: usize) -> String {
    format!("\n{}", indent(value, spaces))
}

/// Fail rendering if a value is undefined, none or empty
///
/// Usage: {{ operator_repo | required("operatorRepo must be set") }}
pub fn required(value: Value, message: Option<String>) -> Result<Value, Error> {
    let missing = value.is_undefined() || value.is_none() || value.as_str() == Some("");
    if missing {
        let msg = message.unwrap_or_else(|| "required value is missing".to_string());
        return Err(Error::new(ErrorKind::InvalidOperation, msg));
    }
    Ok(value)
}

/// Usage: {{ new_version | trimprefix("v") }}
pub fn trimprefix(value: String, prefix: String) -> String {
    value.strip_prefix(prefix.as_str()).unwrap_or(&value).to_string()
}

/// Usage: {{ package_name | trimsuffix("-certified") }}
pub fn trimsuffix(value: String, suffix: String) -> String {
    value.strip_suffix(suffix.as_str()).unwrap_or(&value).to_string()
}

/// Truncate to at most `length` characters
pub fn trunc(value: String, length: usize) -> String {
    value.chars().take(length).collect()
}

#[must_use]
pub fn b64encode(value: String) -> String {
    base64::engine::general_purpose::STANDARD.encode(value.as_bytes())
}

/// Hex SHA-256 of a string
pub fn sha256sum(value: String) -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(value.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toyaml() {
        let value = Value::from_serialize(serde_json::json!({
            "apiGroups": [""],
            "verbs": ["get"]
        }));
        let yaml = toyaml(value).unwrap();
        assert!(yaml.contains("apiGroups:"));
        assert!(yaml.contains("- get"));
        assert!(!yaml.ends_with('\n'));
    }

    #[test]
    fn test_tojson() {
        let value = Value::from_serialize(vec!["--ubi-only", "--distribution-channel=x"]);
        assert_eq!(tojson(value).unwrap(), r#"["--ubi-only","--distribution-channel=x"]"#);
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote(Value::from("say \"hi\"")), r#""say \"hi\"""#);
        assert_eq!(quote(Value::from(3)), "\"3\"");
        assert_eq!(squote(Value::from("it's")), "'it''s'");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\n\nb\n".to_string(), 2), "  a\n\n  b");
        assert_eq!(nindent("a\nb".to_string(), 4), "\n    a\n    b");
    }

    #[test]
    fn test_required() {
        assert!(required(Value::from("x"), None).is_ok());
        assert!(required(Value::from(""), None).is_err());
        assert!(required(Value::UNDEFINED, Some("need it".to_string())).is_err());
        assert!(required(Value::from(false), None).is_ok());
    }

    #[test]
    fn test_trim_and_trunc() {
        assert_eq!(trimprefix("v2.14.0".to_string(), "v".to_string()), "2.14.0");
        assert_eq!(trimsuffix("crd.yaml".to_string(), ".yaml".to_string()), "crd");
        assert_eq!(trunc("elastic-operator".to_string(), 7), "elastic");
        assert_eq!(trunc("eck".to_string(), 10), "eck");
    }

    #[test]
    fn test_hashes() {
        assert_eq!(b64encode("eck".to_string()), "ZWNr");
        assert_eq!(
            sha256sum("".to_string()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
