use crate::errors::Error;
use core::fmt::Display;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A setting can be an unsigned integer, string, list of strings or boolean.
///
/// In text form every setting carries its type as prefix:
///
///   b:true
///   u:234
///   s:hello world
///   m:foo,bar,baz
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Setting {
    UInt(usize),
    String(String),
    Bool(bool),
    Map(Vec<String>),
}

impl Setting {
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::UInt(value) => *value != 0,
            Self::String(value) => is_bool_value(value),
            Self::Map(values) => {
                warn!("setting is not a boolean");
                !values.is_empty()
            }
        }
    }

    #[must_use]
    pub fn to_uint(&self) -> usize {
        match self {
            Self::UInt(value) => *value,
            Self::Bool(value) => usize::from(*value),
            Self::String(value) => value.parse().unwrap_or_else(|_| usize::from(is_bool_value(value))),
            Self::Map(values) => values.len(),
        }
    }

    /// Returns the plain value, without the type prefix that `Display` adds
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            Self::UInt(value) => value.to_string(),
            Self::String(value) => value.clone(),
            Self::Bool(value) => value.to_string(),
            Self::Map(values) => values.join(","),
        }
    }

    #[must_use]
    pub fn to_map(&self) -> Vec<String> {
        match self {
            Self::Map(values) => values.clone(),
            other => vec![other.as_string()],
        }
    }
}

fn is_bool_value(s: &str) -> bool {
    ["YES", "ON", "TRUE", "1"].contains(&s.to_uppercase().as_str())
}

impl Serialize for Setting {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Setting {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(|err| serde::de::Error::custom(format!("cannot deserialize: {err}")))
    }
}

impl Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UInt(value) => write!(f, "u:{value}"),
            Self::String(value) => write!(f, "s:{value}"),
            Self::Bool(value) => write!(f, "b:{value}"),
            Self::Map(values) => write!(f, "m:{}", values.join(",")),
        }
    }
}

impl FromStr for Setting {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Error> {
        let Some((key_type, key_value)) = key.split_once(':') else {
            return Err(Error::Config(format!("setting '{key}' has no type prefix")));
        };

        let setting = match key_type {
            "b" => Self::Bool(
                key_value
                    .parse::<bool>()
                    .map_err(|err| Error::Config(format!("error parsing {key_value}: {err}")))?,
            ),
            "u" => Self::UInt(
                key_value
                    .parse::<usize>()
                    .map_err(|err| Error::Config(format!("error parsing {key_value}: {err}")))?,
            ),
            "s" => Self::String(key_value.to_string()),
            "m" => Self::Map(key_value.split(',').map(str::to_string).collect()),
            _ => return Err(Error::Config(format!("unknown setting type: {key_type}"))),
        };

        Ok(setting)
    }
}

/// `SettingInfo` returns information about a given setting
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SettingInfo {
    /// Name of the key in dot notation (ie: stylesheet.length_unit)
    pub key: String,
    /// Description of the setting
    pub description: String,
    /// Default setting if none has been specified
    pub default: Setting,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_and_convert() {
        let s = Setting::from_str("b:true").unwrap();
        assert_eq!(s, Setting::Bool(true));
        assert!(s.to_bool());
        assert_eq!(1, s.to_uint());
        assert_eq!("true", s.as_string());
        assert_eq!("b:true", s.to_string());

        let s = Setting::from_str("u:12").unwrap();
        assert_eq!(s, Setting::UInt(12));
        assert!(s.to_bool());
        assert_eq!(vec!["12"], s.to_map());

        let s = Setting::from_str("s:px").unwrap();
        assert_eq!(s, Setting::String("px".into()));
        assert!(!s.to_bool());
        assert_eq!("px", s.as_string());

        let s = Setting::from_str("s:yes").unwrap();
        assert!(s.to_bool());

        let s = Setting::from_str("m:hover,focus").unwrap();
        assert_eq!(s, Setting::Map(vec!["hover".into(), "focus".into()]));
        assert_eq!("m:hover,focus", s.to_string());
        assert_eq!(2, s.to_uint());
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(Setting::from_str("notexist:true"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("b:foobar"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("u:-1"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("no prefix"), Err(Error::Config(_))));
    }

    #[test]
    fn serde_uses_prefixed_form() {
        let json = serde_json::to_string(&Setting::Bool(false)).unwrap();
        assert_eq!(json, "\"b:false\"");

        let back: Setting = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Setting::Bool(false));
    }
}
