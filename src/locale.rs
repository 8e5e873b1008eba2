//! Locale identifiers and the parent-locale fallback chain.
//!
//! Identifiers use the underscore form found in table file names
//! (`pt_PT`, `zh_Hant_HK`). Hyphenated BCP-47 input is accepted and
//! normalized on parse.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::NamesError;

static LOCALE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([A-Za-z]{2,3})(?:[_-]([A-Za-z]{4}))?(?:[_-]([A-Za-z]{2}|[0-9]{3}))?((?:[_-][A-Za-z0-9]{4,8}){0,8})$"
    ).expect("locale pattern is valid")
});

const ROOT: &str = "root";
const UNDETERMINED: &str = "und";

/// Most variants a tag may carry; keeps every chain well under
/// `MAX_CHAIN_LEN`.
const MAX_VARIANTS: usize = 8;

/// Parent overrides taken from CLDR `parentLocales`. Everything not listed
/// here falls back by dropping its last subtag.
const DEFAULT_PARENTS: &[(&str, &str)] = &[
    ("en_150", "en_001"),
    ("en_AU", "en_001"),
    ("en_CA", "en_001"),
    ("en_GB", "en_001"),
    ("en_IE", "en_001"),
    ("en_IN", "en_001"),
    ("en_NZ", "en_001"),
    ("en_SG", "en_001"),
    ("en_ZA", "en_001"),
    ("en_AT", "en_150"),
    ("en_BE", "en_150"),
    ("en_CH", "en_150"),
    ("en_DE", "en_150"),
    ("en_DK", "en_150"),
    ("en_FI", "en_150"),
    ("en_NL", "en_150"),
    ("en_SE", "en_150"),
    ("es_AR", "es_419"),
    ("es_BO", "es_419"),
    ("es_CL", "es_419"),
    ("es_CO", "es_419"),
    ("es_CR", "es_419"),
    ("es_EC", "es_419"),
    ("es_GT", "es_419"),
    ("es_HN", "es_419"),
    ("es_MX", "es_419"),
    ("es_NI", "es_419"),
    ("es_PA", "es_419"),
    ("es_PE", "es_419"),
    ("es_PR", "es_419"),
    ("es_PY", "es_419"),
    ("es_SV", "es_419"),
    ("es_US", "es_419"),
    ("es_UY", "es_419"),
    ("es_VE", "es_419"),
    ("pt_AO", "pt_PT"),
    ("pt_CH", "pt_PT"),
    ("pt_CV", "pt_PT"),
    ("pt_GQ", "pt_PT"),
    ("pt_GW", "pt_PT"),
    ("pt_LU", "pt_PT"),
    ("pt_MO", "pt_PT"),
    ("pt_MZ", "pt_PT"),
    ("pt_ST", "pt_PT"),
    ("pt_TL", "pt_PT"),
    ("zh_Hant_MO", "zh_Hant_HK"),
    // Non-default scripts must not inherit the default-script data.
    ("az_Cyrl", ROOT),
    ("bs_Cyrl", ROOT),
    ("pa_Arab", ROOT),
    ("sr_Latn", ROOT),
    ("uz_Arab", ROOT),
    ("uz_Cyrl", ROOT),
    ("yue_Hans", ROOT),
    ("zh_Hant", ROOT),
];

/// A normalized locale identifier, or the root locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleId(String);

impl LocaleId {
    /// The root locale, the last stop of every fallback chain.
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Parses and normalizes a locale identifier.
    ///
    /// ```
    /// use intl_names::LocaleId;
    ///
    /// assert_eq!(LocaleId::parse("pt-pt").unwrap().as_str(), "pt_PT");
    /// assert_eq!(LocaleId::parse("ZH_hant_hk").unwrap().as_str(), "zh_Hant_HK");
    /// assert!(LocaleId::parse("und").unwrap().is_root());
    /// ```
    pub fn parse(input: &str) -> Result<Self, NamesError> {
        if input.eq_ignore_ascii_case(ROOT) || input.eq_ignore_ascii_case(UNDETERMINED) {
            return Ok(Self::root());
        }

        let caps = LOCALE_RE
            .captures(input)
            .ok_or_else(|| NamesError::InvalidLocale(input.to_string()))?;

        let mut normalized = caps[1].to_ascii_lowercase();
        if let Some(script) = caps.get(2) {
            normalized.push('_');
            normalized.push_str(&titlecase(script.as_str()));
        }
        if let Some(region) = caps.get(3) {
            normalized.push('_');
            normalized.push_str(&region.as_str().to_ascii_uppercase());
        }
        if let Some(variants) = caps.get(4) {
            for variant in variants.as_str().split(['_', '-']).filter(|v| !v.is_empty()) {
                normalized.push('_');
                normalized.push_str(&variant.to_ascii_uppercase());
            }
        }

        Ok(Self(normalized))
    }

    /// Wraps a string already in normalized form.
    pub(crate) fn from_normalized(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent by subtag truncation: `pt_PT` -> `pt` -> root. A bare `und`
    /// is root.
    fn truncated(&self) -> Option<LocaleId> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('_') {
            Some((head, _)) if head != UNDETERMINED => Some(Self(head.to_string())),
            _ => Some(Self::root()),
        }
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleId {
    type Err = NamesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn titlecase(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Resolves the parent of a locale: explicit overrides first, then
/// subtag truncation.
#[derive(Debug, Clone)]
pub struct ParentLocales {
    overrides: HashMap<LocaleId, LocaleId>,
}

impl Default for ParentLocales {
    fn default() -> Self {
        let overrides = DEFAULT_PARENTS
            .iter()
            .map(|(child, parent)| (LocaleId::from_normalized(child), LocaleId::from_normalized(parent)))
            .collect();
        Self { overrides }
    }
}

impl ParentLocales {
    /// A resolver with no overrides at all, truncation only.
    pub fn truncation_only() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Adds or replaces parent overrides.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (LocaleId, LocaleId)>,
    {
        self.overrides.extend(overrides);
        self
    }

    /// The next less specific locale, or `None` for root.
    pub fn parent_of(&self, locale: &LocaleId) -> Option<LocaleId> {
        if locale.is_root() {
            return None;
        }
        match self.overrides.get(locale) {
            Some(parent) => Some(parent.clone()),
            None => locale.truncated(),
        }
    }

    /// Iterates from `locale` through its ancestors, ending with root.
    pub fn chain(&self, locale: &LocaleId) -> FallbackChain<'_> {
        FallbackChain {
            parents: self,
            next: Some(locale.clone()),
            remaining: MAX_CHAIN_LEN,
        }
    }
}

// Guards against override cycles supplied through configuration. The
// longest acyclic chain (language, script, region, every variant, the
// deepest CLDR override detour, root) is 15 steps.
const MAX_CHAIN_LEN: usize = 32;

/// Iterator over a locale and its ancestors.
#[derive(Debug, Clone)]
pub struct FallbackChain<'a> {
    parents: &'a ParentLocales,
    next: Option<LocaleId>,
    remaining: usize,
}

impl Iterator for FallbackChain<'_> {
    type Item = LocaleId;

    fn next(&mut self) -> Option<LocaleId> {
        let current = self.next.take()?;
        self.remaining = self.remaining.saturating_sub(1);
        self.next = if current.is_root() {
            None
        } else if self.remaining <= 1 {
            Some(LocaleId::root())
        } else {
            self.parents.parent_of(&current)
        };
        Some(current)
    }
}
