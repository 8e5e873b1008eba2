//! The name store: every loaded table, plus locale fallback.
//!
//! # Invariants
//!
//! 1. **Load is all or nothing**: every loader validates every table before
//!    returning, so a store never holds a partially decoded table.
//! 2. **Read only**: no table changes after the store is built; a
//!    `NameStore` can be shared across threads without locking.
//! 3. **Fallback terminates**: `lookup_with_fallback` walks the parent
//!    chain at most once and ends at root.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde_json::{ Map, Value };

use crate::codec;
use crate::config::NamesConfig;
use crate::error::NamesError;
use crate::locale::{ FallbackChain, LocaleId, ParentLocales };
use crate::table::{ Domain, LocaleTable, NameValue, TableId, TimeZoneNames, EXEMPLAR_CITY_PREFIX };

/// Tables bundled from `data/` by the build script.
const BUNDLED_TABLES: &str = include_str!(concat!(env!("OUT_DIR"), "/all_tables.json"));

static BUNDLED_STORE: Lazy<Result<NameStore, NamesError>> = Lazy::new(|| {
    NameStore::from_bundle_json(BUNDLED_TABLES)
});

/// The process-wide store built from the bundled tables.
///
/// Decoded once, on first call; concurrent first calls block until the
/// single initialization finishes.
pub fn bundled() -> Result<&'static NameStore, &'static NamesError> {
    Lazy::force(&BUNDLED_STORE).as_ref()
}

/// A value found by fallback lookup, with the locale that supplied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub locale: &'a LocaleId,
    pub value: &'a NameValue,
}

/// All loaded name tables, keyed by domain and locale.
#[derive(Debug, Clone, Default)]
pub struct NameStore {
    tables: HashMap<TableId, LocaleTable>,
    parents: ParentLocales,
}

impl NameStore {
    /// An empty store using the default CLDR parent locales.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already decoded tables.
    pub fn from_tables<I>(tables: I) -> Result<Self, NamesError>
    where
        I: IntoIterator<Item = LocaleTable>,
    {
        let mut store = Self::new();
        for table in tables {
            let id = table.id().clone();
            if store.tables.contains_key(&id) {
                return Err(NamesError::DuplicateTable(id.to_string()));
            }
            store.tables.insert(id, table);
        }
        Ok(store)
    }

    /// Loads every `*.json` table in `folder`. Other files are ignored.
    pub fn load_dir(folder: impl AsRef<Path>) -> Result<Self, NamesError> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(NamesError::MissingDataFolder(folder.to_path_buf()));
        }

        tracing::debug!(folder = %folder.display(), "Loading name tables");

        let mut tables = Vec::new();
        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| NamesError::TableName(path.display().to_string()))?;
            let id = TableId::from_file_stem(stem)?;
            let content = fs::read_to_string(&path)?;
            tables.push(codec::decode_str(id, &content)?);
        }

        let store = Self::from_tables(tables)?;
        tracing::debug!(tables = store.tables.len(), "Loaded name tables");
        Ok(store)
    }

    /// Loads a bundle: a JSON object mapping file stems to table documents.
    pub fn from_bundle_json(json: &str) -> Result<Self, NamesError> {
        let bundle: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| NamesError::json("table bundle", e))?;

        let mut tables = Vec::with_capacity(bundle.len());
        for (stem, document) in bundle {
            let id = TableId::from_file_stem(&stem)?;
            tables.push(codec::decode_value(id, document)?);
        }

        let store = Self::from_tables(tables)?;
        tracing::debug!(tables = store.tables.len(), "Decoded bundled name tables");
        Ok(store)
    }

    /// Writes every table into a bundle document, the inverse of
    /// [`NameStore::from_bundle_json`].
    pub fn to_bundle_json(&self) -> Result<String, NamesError> {
        let mut ids: Vec<&TableId> = self.tables.keys().collect();
        ids.sort();

        let mut bundle = Map::new();
        for id in ids {
            bundle.insert(id.file_stem(), codec::encode_value(&self.tables[id])?);
        }
        serde_json::to_string(&Value::Object(bundle)).map_err(|e| NamesError::json("table bundle", e))
    }

    /// Loads the store the way `config` asks for.
    ///
    /// Bundled tables are used when enabled (always with the `bundle-only`
    /// feature) unless the bundle is empty, in which case the data folder
    /// is read instead.
    pub fn from_config(config: &NamesConfig) -> Result<Self, NamesError> {
        let store = if config.use_bundled_tables || cfg!(feature = "bundle-only") {
            let bundled = Self::from_bundle_json(BUNDLED_TABLES)?;
            if bundled.tables.is_empty() {
                tracing::warn!(
                    folder = %config.data_folder.display(),
                    "Bundled name tables are empty, loading from data folder"
                );
                Self::load_dir(&config.data_folder)?
            } else {
                bundled
            }
        } else {
            Self::load_dir(&config.data_folder)?
        };

        Ok(store.with_parents(config.parent_locales()?))
    }

    /// Replaces the parent-locale rules used by fallback lookups.
    pub fn with_parents(mut self, parents: ParentLocales) -> Self {
        self.parents = parents;
        self
    }

    pub fn parents(&self) -> &ParentLocales {
        &self.parents
    }

    /// `locale` followed by its ancestors, ending with root.
    pub fn fallback_chain(&self, locale: &LocaleId) -> FallbackChain<'_> {
        self.parents.chain(locale)
    }

    pub fn table(&self, domain: Domain, locale: &LocaleId) -> Option<&LocaleTable> {
        self.tables.get(&TableId::new(domain, locale.clone()))
    }

    /// Every pair of one table, or `None` if no such table was loaded.
    pub fn get_entries(&self, domain: Domain, locale: &LocaleId) -> Option<&[(String, NameValue)]> {
        self.table(domain, locale).map(LocaleTable::entries)
    }

    /// Exact-key lookup in one table, without fallback.
    pub fn lookup(&self, domain: Domain, locale: &LocaleId, key: &str) -> Option<&NameValue> {
        self.table(domain, locale).and_then(|t| t.get(key))
    }

    /// Looks `key` up in `locale`, then in each less specific locale down
    /// to root. Locales without a table are skipped.
    pub fn lookup_with_fallback(&self, domain: Domain, locale: &LocaleId, key: &str) -> Option<Resolved<'_>> {
        self.fallback_chain(locale).find_map(|candidate| {
            let table = self.table(domain, &candidate)?;
            let value = table.get(key)?;
            Some(Resolved {
                locale: table.locale(),
                value,
            })
        })
    }

    fn text_with_fallback(&self, domain: Domain, locale: &LocaleId, key: &str) -> Option<&str> {
        self.lookup_with_fallback(domain, locale, key)
            .and_then(|r| r.value.as_text())
    }

    /// Locales that have a table in `domain`, sorted.
    pub fn available_locales(&self, domain: Domain) -> Vec<&LocaleId> {
        let mut locales: Vec<&LocaleId> = self
            .tables
            .keys()
            .filter(|id| id.domain == domain)
            .map(|id| &id.locale)
            .collect();
        locales.sort();
        locales
    }

    /// Number of loaded tables across all domains.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = &LocaleTable> {
        self.tables.values()
    }

    /// Currency symbol, keyed by the uppercase ISO 4217 code.
    pub fn currency_symbol(&self, locale: &LocaleId, code: &str) -> Option<&str> {
        self.text_with_fallback(Domain::Currency, locale, &code.to_ascii_uppercase())
    }

    /// Currency display name, keyed by the lowercase ISO 4217 code.
    pub fn currency_name(&self, locale: &LocaleId, code: &str) -> Option<&str> {
        self.text_with_fallback(Domain::Currency, locale, &code.to_ascii_lowercase())
    }

    pub fn language_name(&self, locale: &LocaleId, language: &str) -> Option<&str> {
        self.text_with_fallback(Domain::Locale, locale, &language.to_ascii_lowercase())
    }

    pub fn region_name(&self, locale: &LocaleId, region: &str) -> Option<&str> {
        self.text_with_fallback(Domain::Locale, locale, &region.to_ascii_uppercase())
    }

    pub fn script_name(&self, locale: &LocaleId, script: &str) -> Option<&str> {
        let mut key = script.to_ascii_lowercase();
        if let Some(first) = key.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        self.text_with_fallback(Domain::Locale, locale, &key)
    }

    /// Display name of a Unicode extension key, e.g. `key_name(l, "nu")`.
    pub fn key_name(&self, locale: &LocaleId, key: &str) -> Option<&str> {
        self.text_with_fallback(Domain::Locale, locale, &format!("key.{key}"))
    }

    /// Display name of a Unicode extension type, e.g.
    /// `type_name(l, "nu", "greklow")`.
    pub fn type_name(&self, locale: &LocaleId, key: &str, type_: &str) -> Option<&str> {
        self.text_with_fallback(Domain::Locale, locale, &format!("type.{key}.{type_}"))
    }

    pub fn exemplar_city(&self, locale: &LocaleId, zone_id: &str) -> Option<&str> {
        self.text_with_fallback(Domain::TimeZone, locale, &format!("{EXEMPLAR_CITY_PREFIX}{zone_id}"))
    }

    /// Time zone names merged along the fallback chain: each of the six
    /// names comes from the most specific table that provides it. Names no
    /// table provides stay empty.
    pub fn zone_names(&self, locale: &LocaleId, zone_id: &str) -> Option<TimeZoneNames> {
        let mut merged: Option<TimeZoneNames> = None;
        for candidate in self.fallback_chain(locale) {
            let Some(names) = self
                .table(Domain::TimeZone, &candidate)
                .and_then(|t| t.get_zone_names(zone_id))
            else {
                continue;
            };
            match merged.as_mut() {
                Some(merged) => merged.fill_missing(names),
                None => merged = Some(names.clone()),
            }
            if merged.as_ref().is_some_and(TimeZoneNames::is_complete) {
                break;
            }
        }
        merged
    }
}
