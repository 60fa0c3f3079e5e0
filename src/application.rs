//! The start page controller.
//!
//! [`StartPage`] owns the catalog, the engine list and the settings. Each
//! action computes a new value, swaps it in and saves the slice it touched.

use crate::backup::{self, BackupError, Restore};
use crate::catalog::Catalog;
use crate::config::{self, AppConfig};
use crate::engines::{EngineCatalog, SearchEngine};
use crate::i18n::{Messages, Rejection};
use crate::reorder::{DragItem, ReorderCoordinator};
use crate::settings::{SettingChange, Settings};
use crate::storage::{KeyValueStore, PersistedStore, SqliteStore, StoreError};

pub struct StartPage<S: KeyValueStore> {
    store: PersistedStore<S>,
    catalog: Catalog,
    engines: EngineCatalog,
    settings: Settings,
    drag: ReorderCoordinator,
}

impl<S: KeyValueStore> std::fmt::Debug for StartPage<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartPage")
            .field("categories", &self.catalog.len())
            .field("engines", &self.engines.len())
            .field("language", &self.settings.language)
            .finish_non_exhaustive()
    }
}

impl StartPage<SqliteStore> {
    /// Open the start page backed by the database named in `config`
    pub fn open_with_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store = SqliteStore::open(&config.database_path())?;
        Ok(Self::open(store, &config.locale_hint()))
    }
}

impl<S: KeyValueStore> StartPage<S> {
    /// Load every slice from `backend`, falling back to defaults for
    /// anything missing or unreadable
    pub fn open(backend: S, locale_hint: &str) -> Self {
        let store = PersistedStore::new(backend);

        let settings = Settings::initial(
            store.load_raw(config::STORAGE_KEY_SETTINGS).as_deref(),
            locale_hint,
        );
        let catalog = store
            .load::<Catalog>(config::STORAGE_KEY_DATA)
            .filter(|catalog| is_valid(config::STORAGE_KEY_DATA, catalog.validate()));
        let catalog = Catalog::initial(catalog, settings.language).retranslate(settings.language);
        let engines = store
            .load::<EngineCatalog>(config::STORAGE_KEY_ENGINES)
            .filter(|engines| is_valid(config::STORAGE_KEY_ENGINES, engines.validate()))
            .unwrap_or_default();

        log::info!(
            "Start page loaded: {} categories, {} engines, language {}",
            catalog.len(),
            engines.len(),
            settings.language.code()
        );

        let mut page = Self {
            store,
            catalog,
            engines,
            settings,
            drag: ReorderCoordinator::new(),
        };
        page.save_all();
        page
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn engines(&self) -> &EngineCatalog {
        &self.engines
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &PersistedStore<S> {
        &self.store
    }

    /// Messages in the active language
    pub fn messages(&self) -> &'static Messages {
        Messages::for_language(self.settings.language)
    }

    fn save_all(&mut self) {
        self.store.save(config::STORAGE_KEY_DATA, &self.catalog);
        self.store.save(config::STORAGE_KEY_ENGINES, &self.engines);
        self.store.save(config::STORAGE_KEY_SETTINGS, &self.settings);
    }

    fn set_catalog(&mut self, catalog: Catalog) -> bool {
        if catalog == self.catalog {
            return false;
        }
        self.catalog = catalog;
        self.store.save(config::STORAGE_KEY_DATA, &self.catalog);
        true
    }

    fn set_engines(&mut self, engines: EngineCatalog) -> bool {
        if engines == self.engines {
            return false;
        }
        self.engines = engines;
        self.store.save(config::STORAGE_KEY_ENGINES, &self.engines);
        true
    }

    fn set_settings(&mut self, settings: Settings) -> bool {
        if settings == self.settings {
            return false;
        }
        let language_changed = settings.language != self.settings.language;
        self.settings = settings;
        self.store.save(config::STORAGE_KEY_SETTINGS, &self.settings);

        if language_changed {
            log::info!("Language changed to {}", self.settings.language.code());
            let translated = self.catalog.retranslate(self.settings.language);
            self.set_catalog(translated);
        }
        true
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Append a category, returning its id
    pub fn add_category(&mut self, title: &str) -> Result<String, Rejection> {
        let (catalog, id) = self.catalog.try_add_category(title)?;
        self.set_catalog(catalog);
        log::info!("Added category '{}'", id);
        Ok(id)
    }

    /// Remove a category and its links; false if it did not exist
    pub fn delete_category(&mut self, id: &str) -> bool {
        let catalog = self.catalog.delete_category(id);
        self.set_catalog(catalog)
    }

    /// Append a link to a category, returning its id
    pub fn add_link(
        &mut self,
        category_id: &str,
        title: &str,
        url: &str,
    ) -> Result<String, Rejection> {
        let (catalog, id) = self.catalog.try_add_link(category_id, title, url)?;
        self.set_catalog(catalog);
        log::info!("Added link '{}' to category '{}'", id, category_id);
        Ok(id)
    }

    pub fn delete_link(&mut self, category_id: &str, link_id: &str) -> bool {
        let catalog = self.catalog.delete_link(category_id, link_id);
        self.set_catalog(catalog)
    }

    pub fn reorder_categories(&mut self, source_id: &str, target_id: &str) -> bool {
        let catalog = self.catalog.reorder_categories(source_id, target_id);
        self.set_catalog(catalog)
    }

    pub fn reorder_links(&mut self, category_id: &str, source_id: &str, target_id: &str) -> bool {
        let catalog = self.catalog.reorder_links(category_id, source_id, target_id);
        self.set_catalog(catalog)
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    pub fn begin_drag(&mut self, source: DragItem) {
        self.drag.begin_drag(source);
    }

    /// Drop the pending drag onto `target`; true if the order changed
    pub fn drop_on(&mut self, target: &DragItem) -> bool {
        match self.drag.drop_on(target, &self.catalog) {
            Some(catalog) => self.set_catalog(catalog),
            None => false,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ------------------------------------------------------------------
    // Search engines
    // ------------------------------------------------------------------

    /// Append a search engine, returning its id
    pub fn add_engine(
        &mut self,
        name: &str,
        search_url: &str,
        icon: &str,
    ) -> Result<String, Rejection> {
        let (engines, id) = self.engines.try_add(name, search_url, icon)?;
        self.set_engines(engines);
        log::info!("Added search engine '{}'", id);
        Ok(id)
    }

    /// Remove a search engine; the last one is kept
    pub fn delete_engine(&mut self, id: &str) -> Result<(), Rejection> {
        let engines = self.engines.delete(id)?;
        self.set_engines(engines);
        Ok(())
    }

    /// Make `id` the selected engine; false if no such engine exists
    pub fn select_engine(&mut self, id: &str) -> bool {
        if self.engines.get(id).is_none() {
            log::debug!("Cannot select unknown engine '{}'", id);
            return false;
        }
        self.update_setting(SettingChange::SearchEngine(Some(id.to_string())));
        true
    }

    pub fn selected_engine(&self) -> &SearchEngine {
        self.engines
            .resolve_selected(self.settings.search_engine.as_deref())
    }

    /// Search URL for `query` on the selected engine; None for a blank query
    pub fn search_url(&self, query: &str) -> Option<String> {
        if query.trim().is_empty() {
            return None;
        }
        Some(self.selected_engine().build_search_url(query))
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn update_setting(&mut self, change: SettingChange) -> bool {
        let settings = self.settings.update(change);
        self.set_settings(settings)
    }

    // ------------------------------------------------------------------
    // Backup
    // ------------------------------------------------------------------

    pub fn export_backup(&self) -> Result<String, BackupError> {
        backup::export(&self.catalog, &self.engines, &self.settings)
    }

    /// Parse a backup and apply it. On error nothing is changed.
    pub fn import_backup(&mut self, raw: &str) -> Result<(), BackupError> {
        let restore = backup::import(raw)?;
        self.apply_restore(restore);
        Ok(())
    }

    /// Apply each slice present in `restore`, one after the other
    pub fn apply_restore(&mut self, restore: Restore) {
        if let Some(catalog) = restore.catalog {
            self.set_catalog(catalog);
        }
        if let Some(engines) = restore.engines {
            self.set_engines(engines);
        }
        if let Some(settings) = restore.settings {
            self.set_settings(settings);
        }
        log::info!("Backup restored");
    }
}

/// Stored slices that break id uniqueness are treated like malformed ones
fn is_valid(key: &str, check: Result<(), String>) -> bool {
    match check {
        Ok(()) => true,
        Err(reason) => {
            log::warn!("Stored value for '{}' is inconsistent, ignoring: {}", key, reason);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Link};
    use crate::settings::{Language, Theme};
    use crate::storage::MemoryStore;

    fn open(store: MemoryStore) -> StartPage<MemoryStore> {
        StartPage::open(store, "en_US.UTF-8")
    }

    fn seeded() -> MemoryStore {
        let catalog = Catalog::new(vec![
            Category { id: "c1".into(), title: "Work".into(), links: Vec::new() },
            Category { id: "c2".into(), title: "Daily".into(), links: Vec::new() },
            Category { id: "c3".into(), title: "Fun".into(), links: Vec::new() },
        ]);
        let engines: Vec<SearchEngine> = ["e1", "e2"]
            .iter()
            .map(|id| SearchEngine {
                id: id.to_string(),
                name: id.to_string(),
                search_url: format!("https://{}.example/?q=%s", id),
                icon: "🔍".into(),
            })
            .collect();

        MemoryStore::with_values([
            (config::STORAGE_KEY_DATA, serde_json::to_string(&catalog).unwrap()),
            (config::STORAGE_KEY_ENGINES, serde_json::to_string(&engines).unwrap()),
        ])
    }

    fn stored_catalog(page: &StartPage<MemoryStore>) -> Catalog {
        page.store().load(config::STORAGE_KEY_DATA).unwrap()
    }

    fn ids(catalog: &Catalog) -> Vec<&str> {
        catalog.categories.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_first_start_uses_locale_defaults() {
        let page = StartPage::open(MemoryStore::new(), "zh_CN.UTF-8");

        assert_eq!(page.settings().language, Language::Zh);
        assert_eq!(page.catalog().categories[0].title, "日常");
        assert_eq!(page.engines(), &EngineCatalog::default());
        // Every slice is written on open
        assert_eq!(stored_catalog(&page), *page.catalog());
    }

    #[test]
    fn test_malformed_slices_fall_back() {
        let store = MemoryStore::with_values([
            (config::STORAGE_KEY_DATA, "{broken"),
            (config::STORAGE_KEY_ENGINES, "[]"),
            (config::STORAGE_KEY_SETTINGS, "nope"),
        ]);
        let page = open(store);

        assert_eq!(page.settings(), &Settings::default());
        assert_eq!(page.catalog().len(), 3);
        assert_eq!(page.engines(), &EngineCatalog::default());
    }

    #[test]
    fn test_add_and_delete_link_persist() {
        let mut page = open(seeded());

        let link_id = page.add_link("c1", "Docs", "docs.rs").unwrap();
        let stored = stored_catalog(&page);
        let links = &stored.category("c1").unwrap().links;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://docs.rs");

        assert!(page.delete_link("c1", &link_id));
        assert!(stored_catalog(&page).category("c1").unwrap().links.is_empty());
        assert!(!page.delete_link("c1", &link_id));
    }

    #[test]
    fn test_rejections_leave_state() {
        let mut page = open(seeded());
        let before = page.catalog().clone();

        assert_eq!(page.add_link("c1", "", "x.com"), Err(Rejection::EmptyTitle));
        assert_eq!(page.add_link("zz", "X", "x.com"), Err(Rejection::UnknownCategory));
        assert_eq!(page.add_category("  "), Err(Rejection::EmptyTitle));
        assert_eq!(page.catalog(), &before);
    }

    #[test]
    fn test_category_lifecycle() {
        let mut page = open(seeded());

        let id = page.add_category("Reading").unwrap();
        assert_eq!(stored_catalog(&page).categories.last().unwrap().id, id);

        assert!(page.delete_category(&id));
        assert_eq!(ids(&stored_catalog(&page)), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_engine_deletion_keeps_one() {
        let mut page = open(seeded());

        page.delete_engine("e1").unwrap();
        assert_eq!(page.engines().len(), 1);
        assert_eq!(page.delete_engine("e2"), Err(Rejection::LastEngine));
        assert_eq!(page.engines().engines()[0].id, "e2");

        let stored: Vec<SearchEngine> = page.store().load(config::STORAGE_KEY_ENGINES).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_selected_engine_falls_back() {
        let mut page = open(seeded());

        assert!(page.select_engine("e2"));
        assert_eq!(page.selected_engine().id, "e2");
        assert!(!page.select_engine("missing"));

        page.delete_engine("e2").unwrap();
        assert_eq!(page.settings().search_engine.as_deref(), Some("e2"));
        assert_eq!(page.selected_engine().id, "e1");
    }

    #[test]
    fn test_search_url() {
        let page = open(seeded());
        assert_eq!(page.search_url("  "), None);
        assert_eq!(
            page.search_url("a b").as_deref(),
            Some("https://e1.example/?q=a%20b")
        );
    }

    #[test]
    fn test_language_change_retranslates() {
        let mut page = open(seeded());

        assert!(page.update_setting(SettingChange::Language(Language::Zh)));

        let titles: Vec<_> = page.catalog().categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Work", "日常", "Fun"]);
        assert_eq!(stored_catalog(&page).categories[1].title, "日常");

        let settings: Settings = page.store().load(config::STORAGE_KEY_SETTINGS).unwrap();
        assert_eq!(settings.language, Language::Zh);
        assert_eq!(page.messages().done, "完成");
    }

    #[test]
    fn test_drag_category() {
        let mut page = open(seeded());

        page.begin_drag(DragItem::category("c2"));
        assert!(page.drop_on(&DragItem::category("c1")));

        assert_eq!(ids(page.catalog()), vec!["c2", "c1", "c3"]);
        assert_eq!(ids(&stored_catalog(&page)), vec!["c2", "c1", "c3"]);
        assert!(!page.is_dragging());
    }

    #[test]
    fn test_cancelled_drag_changes_nothing() {
        let mut page = open(seeded());

        page.begin_drag(DragItem::category("c3"));
        page.cancel_drag();
        assert!(!page.drop_on(&DragItem::category("c1")));
        assert_eq!(ids(page.catalog()), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_reorder_links_directly() {
        let mut page = open(seeded());
        let first = page.add_link("c1", "A", "a.example").unwrap();
        let second = page.add_link("c1", "B", "b.example").unwrap();

        assert!(page.reorder_links("c1", &second, &first));
        let order: Vec<_> = page
            .catalog()
            .category("c1")
            .unwrap()
            .links
            .iter()
            .map(|l: &Link| l.id.clone())
            .collect();
        assert_eq!(order, vec![second, first]);
        assert!(!page.reorder_categories("c1", "c1"));
    }

    #[test]
    fn test_import_applies_present_slices() {
        let mut page = open(seeded());
        let engines_before = page.engines().clone();

        page.import_backup(
            r#"{
                "categories": [{ "id": "n1", "title": "News & Read", "links": [] }],
                "settings": { "theme": "dark", "language": "zh" }
            }"#,
        )
        .unwrap();

        assert_eq!(ids(page.catalog()), vec!["n1"]);
        assert_eq!(page.catalog().categories[0].title, "新闻与阅读");
        assert_eq!(page.engines(), &engines_before);
        assert_eq!(page.settings().theme, Theme::Dark);
        assert_eq!(ids(&stored_catalog(&page)), vec!["n1"]);
    }

    #[test]
    fn test_failed_import_changes_nothing() {
        let mut page = open(seeded());
        let catalog = page.catalog().clone();
        let settings = page.settings().clone();

        assert!(page.import_backup("{ not json").is_err());
        assert!(page
            .import_backup(r#"{ "settings": {"theme": "dark"}, "categories": 5 }"#)
            .is_err());

        assert_eq!(page.catalog(), &catalog);
        assert_eq!(page.settings(), &settings);
    }

    #[test]
    fn test_export_then_import_elsewhere() {
        let mut source = open(seeded());
        source.add_link("c3", "Game", "game.example").unwrap();
        source.update_setting(SettingChange::Theme(Theme::Light));
        let document = source.export_backup().unwrap();

        let mut target = open(MemoryStore::new());
        target.import_backup(&document).unwrap();

        assert_eq!(target.catalog(), source.catalog());
        assert_eq!(target.engines(), source.engines());
        assert_eq!(target.settings(), source.settings());
    }

    #[test]
    fn test_duplicate_ids_in_store_fall_back_to_defaults() {
        let data = r#"[
            { "id": "c1", "title": "A", "links": [
                { "id": "l", "title": "One", "url": "https://one.example" },
                { "id": "l", "title": "Two", "url": "https://two.example" }
            ] },
            { "id": "c1", "title": "B", "links": [] }
        ]"#;
        let engines = r#"[
            { "id": "e1", "name": "A", "searchUrl": "https://a.example/?q=%s", "icon": "A" },
            { "id": "e1", "name": "B", "searchUrl": "https://b.example/?q=%s", "icon": "B" }
        ]"#;
        let page = open(MemoryStore::with_values([
            (config::STORAGE_KEY_DATA, data),
            (config::STORAGE_KEY_ENGINES, engines),
        ]));

        assert!(page.catalog().validate().is_ok());
        assert_eq!(ids(page.catalog()), vec!["daily", "work-dev", "news-read"]);
        assert_eq!(page.engines(), &EngineCatalog::default());
        // The repaired slices replace the stored ones
        assert_eq!(stored_catalog(&page), *page.catalog());
    }

    #[test]
    fn test_reopen_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("astralis.db");

        let link_id = {
            let mut page = StartPage::open(SqliteStore::open(&path).unwrap(), "en");
            page.update_setting(SettingChange::GreetingName("Ada".into()));
            page.add_link("daily", "Rust", "rust-lang.org").unwrap()
        };

        let page = StartPage::open(SqliteStore::open(&path).unwrap(), "zh");
        assert_eq!(page.settings().greeting_name, "Ada");
        assert_eq!(page.settings().language, Language::En);
        let daily = page.catalog().category("daily").unwrap();
        assert_eq!(daily.link(&link_id).unwrap().url, "https://rust-lang.org");
    }
}
