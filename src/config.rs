//! Store configuration.

use std::collections::BTreeMap;
use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };

use crate::error::NamesError;
use crate::locale::{ LocaleId, ParentLocales };

/// Configuration for loading a [`NameStore`](crate::NameStore).
///
/// # Example
///
/// ```rust
/// use intl_names::NamesConfig;
///
/// let config = NamesConfig {
///     use_bundled_tables: false,
///     data_folder: "cldr/names".into(),
///     default_locale: "pt_PT".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.default_locale().unwrap().as_str(), "pt_PT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
#[serde(rename_all = "camelCase", default)]
pub struct NamesConfig {
    /// Whether to use the tables compiled into the crate (true) or read
    /// `data_folder` at runtime (false).
    /// Forced to `true` when the `bundle-only` feature is enabled.
    pub use_bundled_tables: bool,
    /// Folder holding `<Domain>Names_<locale>.json` files.
    /// Default: "data"
    pub data_folder: PathBuf,
    /// Locale used by consumers that keep a current locale.
    /// Default: "root"
    pub default_locale: String,
    /// Extra parent-locale rules, child to parent, applied on top of the
    /// CLDR defaults.
    pub parent_overrides: BTreeMap<String, String>,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            use_bundled_tables: true,
            data_folder: PathBuf::from("data"),
            default_locale: "root".to_string(),
            parent_overrides: BTreeMap::new(),
        }
    }
}

impl NamesConfig {
    /// Reads a JSON configuration file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NamesError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Configuration file not found: {:?}", path);
            return Ok(Self::default());
        }

        tracing::debug!("Loading configuration from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| NamesError::json(path.display().to_string(), e))
    }

    pub fn default_locale(&self) -> Result<LocaleId, NamesError> {
        LocaleId::parse(&self.default_locale)
    }

    /// CLDR parent locales with `parent_overrides` applied.
    pub fn parent_locales(&self) -> Result<ParentLocales, NamesError> {
        let overrides = self
            .parent_overrides
            .iter()
            .map(|(child, parent)| Ok((LocaleId::parse(child)?, LocaleId::parse(parent)?)))
            .collect::<Result<Vec<_>, NamesError>>()?;
        Ok(ParentLocales::default().with_overrides(overrides))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intl-names.json");
        fs::write(
            &path,
            r#"{"useBundledTables": false, "dataFolder": "tables", "parentOverrides": {"pt_BR": "pt_PT"}}"#,
        )
        .unwrap();

        let config = NamesConfig::load(&path).unwrap();
        assert!(!config.use_bundled_tables);
        assert_eq!(config.data_folder, PathBuf::from("tables"));
        assert_eq!(config.default_locale, "root");

        let parents = config.parent_locales().unwrap();
        let chain: Vec<_> = parents
            .chain(&LocaleId::parse("pt_BR").unwrap())
            .map(|l| l.to_string())
            .collect();
        assert_eq!(chain, vec!["pt_BR", "pt_PT", "pt", "root"]);
    }

    #[rstest]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = NamesConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, NamesConfig::default());
    }

    #[rstest]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intl-names.json");
        fs::write(&path, "invalid json").unwrap();

        assert!(matches!(NamesConfig::load(&path), Err(NamesError::Json { .. })));
    }

    #[rstest]
    fn test_invalid_override_is_reported() {
        let config = NamesConfig {
            parent_overrides: BTreeMap::from([("pt_BR".to_string(), "not a locale".to_string())]),
            ..Default::default()
        };
        assert!(matches!(config.parent_locales(), Err(NamesError::InvalidLocale(_))));
    }
}
