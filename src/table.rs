//! Table shapes: one immutable, ordered list of `(key, value)` pairs per
//! locale and domain.

use std::collections::{ BTreeMap, HashMap };
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::NamesError;
use crate::locale::LocaleId;

static TABLE_STEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(CurrencyNames|LocaleNames|TimeZoneNames)(?:_(.+))?$").expect("table pattern is valid")
});

/// Prefix of metadata keys (exemplar cities, GMT formats) in time zone tables.
pub const TIMEZONE_META_PREFIX: &str = "timezone.";

/// Prefix of exemplar city keys in time zone tables.
pub const EXEMPLAR_CITY_PREFIX: &str = "timezone.excity.";

/// The kind of names a table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// ISO 4217 codes: uppercase keys map to symbols, lowercase keys to display names
    Currency,
    /// Language, script, region and CLDR `key.*` / `type.*` display names
    Locale,
    /// IANA zone ids map to six names; `timezone.*` keys hold plain strings
    TimeZone,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Currency, Domain::Locale, Domain::TimeZone];

    /// File name prefix used by tables of this domain.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Domain::Currency => "CurrencyNames",
            Domain::Locale => "LocaleNames",
            Domain::TimeZone => "TimeZoneNames",
        }
    }

    fn from_file_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.file_prefix() == prefix)
    }

    /// Whether values under `key` must be six time zone names.
    pub fn expects_zone_names(self, key: &str) -> bool {
        self == Domain::TimeZone && !key.starts_with(TIMEZONE_META_PREFIX)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}

/// Identifies one table: a domain and the locale owning it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId {
    pub domain: Domain,
    pub locale: LocaleId,
}

impl TableId {
    pub fn new(domain: Domain, locale: LocaleId) -> Self {
        Self { domain, locale }
    }

    /// Parses a file stem such as `TimeZoneNames_pt_PT`. A bare prefix
    /// (`CurrencyNames`) names the root table.
    pub fn from_file_stem(stem: &str) -> Result<Self, NamesError> {
        let caps = TABLE_STEM_RE
            .captures(stem)
            .ok_or_else(|| NamesError::TableName(stem.to_string()))?;
        let domain = Domain::from_file_prefix(&caps[1])
            .ok_or_else(|| NamesError::TableName(stem.to_string()))?;
        let locale = match caps.get(2) {
            Some(locale) => LocaleId::parse(locale.as_str())?,
            None => LocaleId::root(),
        };
        Ok(Self { domain, locale })
    }

    /// The file stem this table is persisted under.
    pub fn file_stem(&self) -> String {
        if self.locale.is_root() {
            self.domain.file_prefix().to_string()
        } else {
            format!("{}_{}", self.domain.file_prefix(), self.locale)
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// Which of the six time zone names to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneNameKind {
    LongStandard = 0,
    ShortStandard = 1,
    LongDaylight = 2,
    ShortDaylight = 3,
    LongGeneric = 4,
    ShortGeneric = 5,
}

impl ZoneNameKind {
    pub const ALL: [ZoneNameKind; 6] = [
        ZoneNameKind::LongStandard,
        ZoneNameKind::ShortStandard,
        ZoneNameKind::LongDaylight,
        ZoneNameKind::ShortDaylight,
        ZoneNameKind::LongGeneric,
        ZoneNameKind::ShortGeneric,
    ];
}

/// The six display names of a time zone.
///
/// An empty element means the table has no override for it; the consumer
/// computes its own label (for example from a GMT offset).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TimeZoneNames([String; 6]);

impl TimeZoneNames {
    pub fn new(names: [String; 6]) -> Self {
        Self(names)
    }

    /// The name of the given kind, `None` when empty.
    pub fn get(&self, kind: ZoneNameKind) -> Option<&str> {
        let name = &self.0[kind as usize];
        (!name.is_empty()).then_some(name.as_str())
    }

    pub fn long_standard(&self) -> Option<&str> {
        self.get(ZoneNameKind::LongStandard)
    }

    pub fn short_standard(&self) -> Option<&str> {
        self.get(ZoneNameKind::ShortStandard)
    }

    pub fn long_daylight(&self) -> Option<&str> {
        self.get(ZoneNameKind::LongDaylight)
    }

    pub fn short_daylight(&self) -> Option<&str> {
        self.get(ZoneNameKind::ShortDaylight)
    }

    pub fn long_generic(&self) -> Option<&str> {
        self.get(ZoneNameKind::LongGeneric)
    }

    pub fn short_generic(&self) -> Option<&str> {
        self.get(ZoneNameKind::ShortGeneric)
    }

    /// All six names in table order, empty strings included.
    pub fn as_array(&self) -> &[String; 6] {
        &self.0
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|n| !n.is_empty())
    }

    /// Fills every empty name from `fallback`, keeping names already set.
    pub fn fill_missing(&mut self, fallback: &TimeZoneNames) {
        for (name, other) in self.0.iter_mut().zip(fallback.0.iter()) {
            if name.is_empty() && !other.is_empty() {
                name.clone_from(other);
            }
        }
    }
}

impl TryFrom<Vec<String>> for TimeZoneNames {
    /// The offending length
    type Error = usize;

    fn try_from(names: Vec<String>) -> Result<Self, usize> {
        let len = names.len();
        <[String; 6]>::try_from(names).map(Self).map_err(|_| len)
    }
}

/// A table value: a single string or a set of time zone names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValue {
    Text(String),
    Zone(Arc<TimeZoneNames>),
}

impl NameValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NameValue::Text(s) => Some(s),
            NameValue::Zone(_) => None,
        }
    }

    pub fn as_zone_names(&self) -> Option<&TimeZoneNames> {
        match self {
            NameValue::Zone(names) => Some(names),
            NameValue::Text(_) => None,
        }
    }
}

impl From<&str> for NameValue {
    fn from(s: &str) -> Self {
        NameValue::Text(s.to_string())
    }
}

impl From<TimeZoneNames> for NameValue {
    fn from(names: TimeZoneNames) -> Self {
        NameValue::Zone(Arc::new(names))
    }
}

/// An immutable name table for one locale and domain.
///
/// Entries keep their source order; lookups go through a key index.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    id: TableId,
    entries: Vec<(String, NameValue)>,
    index: HashMap<String, usize>,
    name_sets: BTreeMap<String, Arc<TimeZoneNames>>,
}

impl LocaleTable {
    /// Builds a table, rejecting duplicate keys and values of the wrong
    /// shape for the domain.
    pub fn from_entries<I>(id: TableId, entries: I) -> Result<Self, NamesError>
    where
        I: IntoIterator<Item = (String, NameValue)>,
    {
        Self::with_name_sets(id, BTreeMap::new(), entries)
    }

    pub(crate) fn with_name_sets<I>(
        id: TableId,
        name_sets: BTreeMap<String, Arc<TimeZoneNames>>,
        entries: I,
    ) -> Result<Self, NamesError>
    where
        I: IntoIterator<Item = (String, NameValue)>,
    {
        if id.domain != Domain::TimeZone && !name_sets.is_empty() {
            return Err(NamesError::MisplacedNameSets(id.to_string()));
        }

        let mut table = Self {
            id,
            entries: Vec::new(),
            index: HashMap::new(),
            name_sets,
        };
        for (key, value) in entries {
            table.push(key, value)?;
        }
        Ok(table)
    }

    fn push(&mut self, key: String, value: NameValue) -> Result<(), NamesError> {
        let zone_expected = self.id.domain.expects_zone_names(&key);
        match (&value, zone_expected) {
            (NameValue::Text(_), false) | (NameValue::Zone(_), true) => {}
            (NameValue::Zone(_), false) => {
                return Err(NamesError::UnexpectedValue {
                    table: self.id.to_string(),
                    key,
                    expected: "a string",
                });
            }
            (NameValue::Text(_), true) => {
                return Err(NamesError::UnexpectedValue {
                    table: self.id.to_string(),
                    key,
                    expected: "six time zone names",
                });
            }
        }

        if self.index.contains_key(&key) {
            return Err(NamesError::DuplicateKey {
                table: self.id.to_string(),
                key,
            });
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    pub fn id(&self) -> &TableId {
        &self.id
    }

    pub fn locale(&self) -> &LocaleId {
        &self.id.locale
    }

    pub fn domain(&self) -> Domain {
        self.id.domain
    }

    /// Every pair in the table, in source order.
    pub fn entries(&self) -> &[(String, NameValue)] {
        &self.entries
    }

    /// Exact, case-sensitive key lookup.
    pub fn get(&self, key: &str) -> Option<&NameValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(NameValue::as_text)
    }

    pub fn get_zone_names(&self, key: &str) -> Option<&TimeZoneNames> {
        self.get(key).and_then(NameValue::as_zone_names)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared time zone name sets, by name.
    pub fn name_sets(&self) -> &BTreeMap<String, Arc<TimeZoneNames>> {
        &self.name_sets
    }
}
