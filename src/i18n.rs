//! Localized user-facing messages.

use crate::settings::Language;

/// Strings shown in confirmation prompts and notices
#[derive(Debug)]
pub struct Messages {
    pub delete_link_confirm: &'static str,
    pub delete_category_confirm: &'static str,
    pub delete_engine_confirm: &'static str,
    pub import_confirm: &'static str,
    pub min_one_engine: &'static str,
    pub done: &'static str,
    pub invalid_backup: &'static str,
    pub empty_title: &'static str,
    pub empty_url: &'static str,
    pub empty_name: &'static str,
    pub unknown_category: &'static str,
    /// `%s` is the engine name
    pub search_placeholder: &'static str,
}

static EN: Messages = Messages {
    delete_link_confirm: "Delete this shortcut?",
    delete_category_confirm: "Delete this category and all its shortcuts?",
    delete_engine_confirm: "Delete this search engine?",
    import_confirm: "Importing will overwrite your current data. Continue?",
    min_one_engine: "You must have at least one search engine.",
    done: "Done",
    invalid_backup: "Invalid backup file.",
    empty_title: "Please enter a title.",
    empty_url: "Please enter a URL.",
    empty_name: "Please enter a name.",
    unknown_category: "That category no longer exists.",
    search_placeholder: "Search with %s",
};

static ZH: Messages = Messages {
    delete_link_confirm: "确定删除这个快捷方式吗？",
    delete_category_confirm: "确定删除这个分类及其所有快捷方式吗？",
    delete_engine_confirm: "确定删除这个搜索引擎吗？",
    import_confirm: "导入将覆盖当前数据，是否继续？",
    min_one_engine: "至少需要保留一个搜索引擎。",
    done: "完成",
    invalid_backup: "无效的备份文件。",
    empty_title: "请输入标题。",
    empty_url: "请输入网址。",
    empty_name: "请输入名称。",
    unknown_category: "该分类已不存在。",
    search_placeholder: "使用 %s 搜索",
};

impl Messages {
    pub fn for_language(language: Language) -> &'static Messages {
        match language {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }

    /// Search box placeholder for the given engine name
    pub fn search_placeholder_for(&self, engine_name: &str) -> String {
        self.search_placeholder.replacen("%s", engine_name, 1)
    }
}

/// Why a user action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyTitle,
    EmptyUrl,
    EmptyName,
    UnknownCategory,
    LastEngine,
}

impl Rejection {
    /// Localized notice for the user
    pub fn message(self, language: Language) -> &'static str {
        let messages = Messages::for_language(language);
        match self {
            Rejection::EmptyTitle => messages.empty_title,
            Rejection::EmptyUrl => messages.empty_url,
            Rejection::EmptyName => messages.empty_name,
            Rejection::UnknownCategory => messages.unknown_category,
            Rejection::LastEngine => messages.min_one_engine,
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message(Language::En))
    }
}

impl std::error::Error for Rejection {}
