//! Format-neutral representation of tool configuration values.
//!
//! TOML tables, YAML mappings and INI sections all collapse into
//! [`ConfigValue`]. Maps are `BTreeMap`s so every rendering of a value is
//! deterministic regardless of source-file ordering.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub type ConfigMap = BTreeMap<String, ConfigValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<ConfigValue>),
    Map(ConfigMap),
}

impl ConfigValue {
    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{s:?}"),
            ConfigValue::Integer(i) => write!(f, "{i}"),
            ConfigValue::Float(x) => write!(f, "{x}"),
            ConfigValue::Boolean(b) => write!(f, "{b}"),
            ConfigValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            ConfigValue::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} = {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ConfigValue::String(s),
            toml::Value::Integer(i) => ConfigValue::Integer(i),
            toml::Value::Float(x) => ConfigValue::Float(x),
            toml::Value::Boolean(b) => ConfigValue::Boolean(b),
            toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(ConfigValue::from).collect())
            }
            toml::Value::Table(table) => ConfigValue::Map(map_from_toml(table)),
        }
    }
}

pub fn map_from_toml(table: toml::Table) -> ConfigMap {
    table
        .into_iter()
        .map(|(k, v)| (k, ConfigValue::from(v)))
        .collect()
}

// ---------------------------------------------------------------------------
// YAML
// ---------------------------------------------------------------------------

/// Convert a YAML value. `null` has no counterpart and yields `None`;
/// nulls inside sequences and mappings are dropped.
pub fn from_yaml(value: serde_yaml::Value) -> Option<ConfigValue> {
    use serde_yaml::Value;

    match value {
        Value::Null => None,
        Value::Bool(b) => Some(ConfigValue::Boolean(b)),
        Value::Number(n) => Some(if let Some(i) = n.as_i64() {
            ConfigValue::Integer(i)
        } else if let Some(x) = n.as_f64() {
            ConfigValue::Float(x)
        } else {
            ConfigValue::String(n.to_string())
        }),
        Value::String(s) => Some(ConfigValue::String(s)),
        Value::Sequence(items) => Some(ConfigValue::List(
            items.into_iter().filter_map(from_yaml).collect(),
        )),
        Value::Mapping(mapping) => Some(ConfigValue::Map(map_from_yaml(mapping))),
        Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

pub fn map_from_yaml(mapping: serde_yaml::Mapping) -> ConfigMap {
    mapping
        .into_iter()
        .filter_map(|(k, v)| Some((yaml_key(k)?, from_yaml(v)?)))
        .collect()
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// INI
// ---------------------------------------------------------------------------

/// Parse INI the way Python tools read their own config files: indented
/// lines continue the previous value, backslashes and quotes are literal.
pub fn parse_ini(content: &str) -> std::result::Result<ini::Ini, ini::ParseError> {
    let opt = ini::ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..Default::default()
    };
    ini::Ini::load_from_str_opt(content, opt)
}

/// Sections become nested maps; properties outside any section sit at the
/// top level. INI carries no types, so every leaf is a string.
pub fn map_from_ini(ini: &ini::Ini) -> ConfigMap {
    let mut out = ConfigMap::new();
    for (section, props) in ini.iter() {
        let entries: ConfigMap = props
            .iter()
            .map(|(k, v)| (k.to_string(), ConfigValue::String(ini_value(v))))
            .collect();
        match section {
            Some(name) => {
                out.insert(name.to_string(), ConfigValue::Map(entries));
            }
            None => out.extend(entries),
        }
    }
    out
}

/// Multi-line values keep one trimmed line per entry; blank lines are dropped.
fn ini_value(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
