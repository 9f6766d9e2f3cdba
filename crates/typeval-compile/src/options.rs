use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_ROOT_MARKER: &str = "$$root";
pub const DEFAULT_BUFFER_TYPE: &str = "Buffer";

/// Well-known type names and the validator keyword each one maps to.
pub const DEFAULT_PREDEFINED: [(&str, &str); 8] = [
    ("ICurrency", "currency"),
    ("IDate", "date"),
    ("IEmail", "email"),
    ("IForbidden", "forbidden"),
    ("IMac", "mac"),
    ("IUrl", "url"),
    ("IUUID", "uuid"),
    ("IObjectID", "objectID"),
];

/// Compiler settings.
///
/// Deserialized from the kebab-case keys of a configuration file. Entries of a
/// `[predefined]` table are layered over the default table rather than
/// replacing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompileOptions {
    /// Field set on the outermost keyword rules.
    pub root_marker: String,
    /// Display name of the byte buffer class.
    pub buffer_type: String,
    #[serde(deserialize_with = "deserialize_predefined")]
    pub predefined: IndexMap<String, String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
            buffer_type: DEFAULT_BUFFER_TYPE.to_string(),
            predefined: default_predefined(),
        }
    }
}

impl CompileOptions {
    pub fn predefined_keyword(&self, name: &str) -> Option<&str> {
        self.predefined.get(name).map(String::as_str)
    }

    /// Layer `other` over `self`: scalar settings are replaced and predefined
    /// entries are merged.
    pub fn merge(&mut self, other: CompileOptions) {
        self.root_marker = other.root_marker;
        self.buffer_type = other.buffer_type;
        self.predefined.extend(other.predefined);
    }
}

fn default_predefined() -> IndexMap<String, String> {
    DEFAULT_PREDEFINED
        .iter()
        .map(|(name, keyword)| (name.to_string(), keyword.to_string()))
        .collect()
}

fn deserialize_predefined<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = IndexMap::<String, String>::deserialize(deserializer)?;
    let mut predefined = default_predefined();
    predefined.extend(entries);
    Ok(predefined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::default();
        assert_eq!(options.root_marker, "$$root");
        assert_eq!(options.buffer_type, "Buffer");
        assert_eq!(options.predefined_keyword("IObjectID"), Some("objectID"));
        assert_eq!(options.predefined_keyword("IPhone"), None);
    }

    #[test]
    fn test_predefined_entries_are_merged() {
        let options: CompileOptions = toml::from_str(
            r#"
            root-marker = "$root"

            [predefined]
            IPhone = "string"
            IDate = "string"
            "#,
        )
        .unwrap();
        assert_eq!(options.root_marker, "$root");
        assert_eq!(options.buffer_type, "Buffer");
        assert_eq!(options.predefined_keyword("IPhone"), Some("string"));
        assert_eq!(options.predefined_keyword("IDate"), Some("string"));
        assert_eq!(options.predefined_keyword("IEmail"), Some("email"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<CompileOptions>("root_marker = \"x\"").is_err());
    }

    #[test]
    fn test_merge_layers_tables() {
        let mut options = CompileOptions::default();
        let mut other = CompileOptions {
            buffer_type: "Uint8Array".to_string(),
            ..CompileOptions::default()
        };
        other.predefined.insert("IHex".into(), "string".into());
        options.merge(other);
        assert_eq!(options.buffer_type, "Uint8Array");
        assert_eq!(options.predefined_keyword("IHex"), Some("string"));
        assert_eq!(options.predefined_keyword("IMac"), Some("mac"));
    }
}
