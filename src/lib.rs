#![doc = include_str!("../README.md")]

//! # intl-names
//!
//! CLDR display-name tables for use by internationalization code:
//!
//! - **Currency names**: ISO 4217 symbols (`"AFN"`) and display names (`"afn"`)
//! - **Locale names**: languages, scripts, regions and Unicode extension types
//! - **Time zone names**: six names per IANA zone, plus exemplar cities
//! - **Bundled data**: `data/*.json` is compiled into the crate at build time
//! - **Folder loading**: read tables from a folder at runtime instead
//! - **Fallback**: CLDR parent-locale chains (`pt_AO` -> `pt_PT` -> `pt` -> root)
//! - **Bevy**: optional `bevy` feature with a plugin and resource
//!
//! ## Quick Start
//!
//! ```rust
//! use intl_names::{ Domain, LocaleId };
//!
//! let store = intl_names::bundled().expect("bundled tables are valid");
//! let ps = LocaleId::parse("ps").unwrap();
//!
//! assert_eq!(store.currency_symbol(&ps, "AFN"), Some("\u{060b}"));
//! assert_eq!(store.currency_name(&ps, "AFN"), Some("افغانۍ"));
//!
//! let pt_pt = LocaleId::parse("pt-PT").unwrap();
//! let london = store.lookup(Domain::TimeZone, &pt_pt, "Europe/London").unwrap();
//! assert_eq!(
//!     london.as_zone_names().unwrap().long_standard(),
//!     Some("Hora de Greenwich")
//! );
//! ```
//!
//! ## Data Layout
//!
//! One JSON file per table, named `<Domain>Names_<locale>.json`
//! (`CurrencyNames_ps.json`, `TimeZoneNames_pt_PT.json`); the root table of
//! a domain has no locale suffix. See [`codec`] for the document format.
//! Tables are validated when loaded: duplicate keys, time zone entries
//! without exactly six names, and similar defects fail the whole load.
//!
//! Missing keys and missing tables are not errors. Lookups return `None`
//! and [`NameStore::lookup_with_fallback`] retries less specific locales.

pub mod codec;
mod config;
mod error;
mod locale;
#[cfg(feature = "bevy")]
mod plugin;
mod store;
mod table;

pub use config::NamesConfig;
pub use error::NamesError;
pub use locale::{ FallbackChain, LocaleId, ParentLocales };
#[cfg(feature = "bevy")]
pub use plugin::{ Names, NamesAppExt, NamesPlugin };
pub use store::{ bundled, NameStore, Resolved };
pub use table::{
    Domain,
    LocaleTable,
    NameValue,
    TableId,
    TimeZoneNames,
    ZoneNameKind,
    EXEMPLAR_CITY_PREFIX,
    TIMEZONE_META_PREFIX,
};
