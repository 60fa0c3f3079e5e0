//! Backup export and restore of all three slices as one JSON document.
//!
//! Document shape: `{ "categories": [...], "searchEngines": [...], "settings": {...} }`.
//! Every top-level key is optional on import.

use crate::catalog::{Catalog, Category};
use crate::config;
use crate::engines::{EngineCatalog, SearchEngine};
use crate::settings::Settings;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Error type for backup operations
#[derive(Debug)]
pub enum BackupError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidShape(String),
}

impl std::fmt::Display for BackupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupError::Io(e) => write!(f, "IO error: {}", e),
            BackupError::Parse(e) => write!(f, "Backup is not valid JSON: {}", e),
            BackupError::InvalidShape(reason) => write!(f, "Invalid backup: {}", reason),
        }
    }
}

impl std::error::Error for BackupError {}

impl From<std::io::Error> for BackupError {
    fn from(e: std::io::Error) -> Self {
        BackupError::Io(e)
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(e: serde_json::Error) -> Self {
        BackupError::Parse(e)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupDocument<'a> {
    categories: &'a Catalog,
    search_engines: &'a EngineCatalog,
    settings: &'a Settings,
}

/// Slices recovered from a backup; `None` means "keep the current one"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restore {
    pub catalog: Option<Catalog>,
    pub engines: Option<EngineCatalog>,
    pub settings: Option<Settings>,
}

impl Restore {
    pub fn is_empty(&self) -> bool {
        self.catalog.is_none() && self.engines.is_none() && self.settings.is_none()
    }
}

/// Serialize all slices into a pretty-printed document
pub fn export(
    catalog: &Catalog,
    engines: &EngineCatalog,
    settings: &Settings,
) -> Result<String, BackupError> {
    let document = BackupDocument {
        categories: catalog,
        search_engines: engines,
        settings,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write a backup document to `path`
pub fn export_to_file(
    path: &Path,
    catalog: &Catalog,
    engines: &EngineCatalog,
    settings: &Settings,
) -> Result<(), BackupError> {
    let contents = export(catalog, engines, settings)?;
    fs::write(path, contents)?;
    log::info!("Backup written to {:?}", path);
    Ok(())
}

/// Suggested download name, e.g. `astralis_backup_2024-05-01.json`
pub fn backup_filename(date: NaiveDate) -> String {
    format!("{}{}.json", config::BACKUP_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// [`backup_filename`] for today's local date
pub fn backup_filename_today() -> String {
    backup_filename(chrono::Local::now().date_naive())
}

fn parse_slice<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, BackupError> {
    serde_json::from_value(value.clone())
        .map_err(|e| BackupError::InvalidShape(format!("'{}': {}", key, e)))
}

/// Present, non-null value under `key`
fn field<'a>(document: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    document.get(key).filter(|v| !v.is_null())
}

/// Parse and validate a backup document.
///
/// Nothing is returned unless the whole document is usable, so a failed
/// import never leaves the caller half-restored.
pub fn import(raw: &str) -> Result<Restore, BackupError> {
    let value: Value = serde_json::from_str(raw)?;
    let Some(document) = value.as_object() else {
        return Err(BackupError::InvalidShape("document is not an object".to_string()));
    };

    let catalog = match field(document, "categories") {
        Some(value) => {
            let categories: Vec<Category> = parse_slice("categories", value)?;
            let catalog = Catalog::new(categories);
            catalog.validate().map_err(BackupError::InvalidShape)?;
            Some(catalog)
        }
        None => None,
    };

    let engines = match field(document, "searchEngines") {
        Some(value) => {
            let engines: Vec<SearchEngine> = parse_slice("searchEngines", value)?;
            if engines.is_empty() {
                log::warn!("Backup has an empty engine list, keeping current engines");
                None
            } else {
                let engines = EngineCatalog::new(engines);
                engines.validate().map_err(BackupError::InvalidShape)?;
                Some(engines)
            }
        }
        None => None,
    };

    let settings = field(document, "settings").map(Settings::import_from);

    Ok(Restore {
        catalog,
        engines,
        settings,
    })
}

/// Read and parse a backup file
pub fn import_from_file(path: &Path) -> Result<Restore, BackupError> {
    let contents = fs::read_to_string(path)?;
    import(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::defaults::default_catalog;
    use crate::settings::{Language, Theme};

    #[test]
    fn test_export_then_import() {
        let catalog = default_catalog(Language::En);
        let engines = EngineCatalog::default();
        let settings = Settings {
            theme: Theme::Dark,
            greeting_name: "Ada".into(),
            ..Settings::default()
        };

        let document = export(&catalog, &engines, &settings).unwrap();
        assert!(document.contains("\n  \"categories\""));
        assert!(document.contains("\"searchEngines\""));

        let restore = import(&document).unwrap();
        assert_eq!(restore.catalog, Some(catalog));
        assert_eq!(restore.engines, Some(engines));
        assert_eq!(restore.settings, Some(settings));
    }

    #[test]
    fn test_import_partial_document() {
        let restore = import(r#"{ "settings": { "theme": "light", "unknown": 1 } }"#).unwrap();

        assert_eq!(restore.catalog, None);
        assert_eq!(restore.engines, None);
        assert_eq!(
            restore.settings,
            Some(Settings {
                theme: Theme::Light,
                ..Settings::default()
            })
        );
    }

    #[test]
    fn test_import_empty_object() {
        assert!(import("{}").unwrap().is_empty());
    }

    #[test]
    fn test_import_malformed_json() {
        assert!(matches!(import("{\"categories\": ["), Err(BackupError::Parse(_))));
    }

    #[test]
    fn test_import_wrong_shape() {
        assert!(matches!(import("[1, 2]"), Err(BackupError::InvalidShape(_))));
        assert!(matches!(
            import(r#"{ "categories": "nope", "settings": {} }"#),
            Err(BackupError::InvalidShape(_))
        ));
        assert!(matches!(
            import(r#"{ "searchEngines": [{ "id": "x" }] }"#),
            Err(BackupError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_import_rejects_duplicate_category_ids() {
        let raw = r#"{ "categories": [
            { "id": "c1", "title": "A", "links": [] },
            { "id": "c1", "title": "B", "links": [] }
        ] }"#;
        assert!(matches!(import(raw), Err(BackupError::InvalidShape(_))));
    }

    #[test]
    fn test_import_rejects_duplicate_engine_ids() {
        let raw = r#"{ "searchEngines": [
            { "id": "e1", "name": "A", "searchUrl": "https://a.example/?q=%s", "icon": "A" },
            { "id": "e1", "name": "B", "searchUrl": "https://b.example/?q=%s", "icon": "B" }
        ] }"#;
        assert!(matches!(import(raw), Err(BackupError::InvalidShape(_))));
    }

    #[test]
    fn test_import_empty_engines_keeps_current() {
        let restore = import(r#"{ "searchEngines": [], "categories": [] }"#).unwrap();
        assert_eq!(restore.engines, None);
        assert_eq!(restore.catalog, Some(Catalog::default()));
    }

    #[test]
    fn test_import_category_without_links() {
        let restore = import(r#"{ "categories": [{ "id": "c1", "title": "A" }] }"#).unwrap();
        let catalog = restore.catalog.unwrap();
        assert!(catalog.category("c1").unwrap().links.is_empty());
    }

    #[test]
    fn test_backup_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(backup_filename(date), "astralis_backup_2024-05-01.json");
        assert!(backup_filename_today().starts_with("astralis_backup_"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        let catalog = default_catalog(Language::Zh);

        export_to_file(&path, &catalog, &EngineCatalog::default(), &Settings::default()).unwrap();
        let restore = import_from_file(&path).unwrap();

        assert_eq!(restore.catalog, Some(catalog));
    }
}
