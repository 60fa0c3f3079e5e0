//! A personal start page: bookmark categories, search engines and
//! preferences, persisted locally.

pub mod application;
pub mod backup;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod engines;
pub mod favicon;
pub mod i18n;
pub mod id;
pub mod reorder;
pub mod settings;
pub mod storage;

pub use application::StartPage;
pub use catalog::{Catalog, Category, Link};
pub use engines::{EngineCatalog, SearchEngine};
pub use settings::{Language, SettingChange, Settings};
