//! Bevy integration, enabled with the `bevy` feature.

use bevy::prelude::*;

use crate::config::NamesConfig;
use crate::locale::LocaleId;
use crate::store::NameStore;
use crate::table::{ Domain, TimeZoneNames };

/// Plugin exposing the name tables as the [`Names`] resource.
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use intl_names::{ NamesConfig, NamesPlugin };
///
/// App::new().add_plugins(NamesPlugin::with_config(NamesConfig {
///     default_locale: "pt_PT".to_string(),
///     ..Default::default()
/// }));
/// ```
#[derive(Default)]
pub struct NamesPlugin {
    pub config: NamesConfig,
}

impl NamesPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NamesConfig) -> Self {
        Self { config }
    }
}

impl Plugin for NamesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone()).init_resource::<Names>();
    }
}

/// Display names for the current locale.
///
/// ```rust,ignore
/// fn label(names: Res<intl_names::Names>) {
///     let symbol = names.currency_symbol("EUR").unwrap_or("EUR");
/// }
/// ```
#[derive(Resource)]
pub struct Names {
    store: NameStore,
    current_locale: LocaleId,
}

impl FromWorld for Names {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<NamesConfig>().cloned().unwrap_or_default();

        let store = NameStore::from_config(&config).unwrap_or_else(|e| {
            error!("Failed to load name tables: {}", e);
            NameStore::new()
        });
        let current_locale = config.default_locale().unwrap_or_else(|e| {
            warn!("{}, using root", e);
            LocaleId::root()
        });

        Self { store, current_locale }
    }
}

impl Names {
    pub fn store(&self) -> &NameStore {
        &self.store
    }

    pub fn locale(&self) -> &LocaleId {
        &self.current_locale
    }

    /// Switches the current locale.
    ///
    /// Ignored, with a warning, when the locale is invalid or no table in
    /// any domain covers it or one of its ancestors other than root.
    pub fn set_locale(&mut self, locale: &str) {
        let parsed = match LocaleId::parse(locale) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };

        let covered = parsed.is_root()
            || self.store.fallback_chain(&parsed).any(|candidate| {
                !candidate.is_root()
                    && Domain::ALL
                        .iter()
                        .any(|&domain| self.store.table(domain, &candidate).is_some())
            });
        if !covered {
            warn!("Locale '{}' not available in name tables", locale);
            return;
        }
        self.current_locale = parsed;
    }

    pub fn available_locales(&self, domain: Domain) -> Vec<&LocaleId> {
        self.store.available_locales(domain)
    }

    pub fn currency_symbol(&self, code: &str) -> Option<&str> {
        self.store.currency_symbol(&self.current_locale, code)
    }

    pub fn currency_name(&self, code: &str) -> Option<&str> {
        self.store.currency_name(&self.current_locale, code)
    }

    pub fn language_name(&self, language: &str) -> Option<&str> {
        self.store.language_name(&self.current_locale, language)
    }

    pub fn region_name(&self, region: &str) -> Option<&str> {
        self.store.region_name(&self.current_locale, region)
    }

    pub fn zone_names(&self, zone_id: &str) -> Option<TimeZoneNames> {
        self.store.zone_names(&self.current_locale, zone_id)
    }

    pub fn exemplar_city(&self, zone_id: &str) -> Option<&str> {
        self.store.exemplar_city(&self.current_locale, zone_id)
    }
}

/// Extension trait for `App` to switch the names locale directly.
pub trait NamesAppExt {
    fn set_names_locale(&mut self, locale: &str);
}

impl NamesAppExt for App {
    fn set_names_locale(&mut self, locale: &str) {
        if let Some(mut names) = self.world_mut().get_resource_mut::<Names>() {
            names.set_locale(locale);
        }
    }
}
