//! Default categories per language and the title translation table.

use super::{Catalog, Category, Link};
use crate::settings::Language;

/// Default category titles: (English, Chinese)
pub const CATEGORY_TITLES: &[(&str, &str)] = &[
    ("Daily", "日常"),
    ("Work & Dev", "工作与开发"),
    ("News & Read", "新闻与阅读"),
];

/// Localized form of a default category title.
///
/// `title` may be in either language; returns None for titles that are
/// not one of the defaults (e.g. renamed by the user).
pub fn translate_title(title: &str, language: Language) -> Option<&'static str> {
    CATEGORY_TITLES
        .iter()
        .find(|(en, zh)| *en == title || *zh == title)
        .map(|(en, zh)| match language {
            Language::En => *en,
            Language::Zh => *zh,
        })
}

/// Default links per category: (id, title, url)
type LinkTable = &'static [(&'static str, &'static str, &'static str)];

const DAILY_EN: LinkTable = &[
    ("daily-1", "Google", "https://www.google.com"),
    ("daily-2", "YouTube", "https://www.youtube.com"),
    ("daily-3", "Gmail", "https://mail.google.com"),
    ("daily-4", "Wikipedia", "https://www.wikipedia.org"),
];

const WORK_EN: LinkTable = &[
    ("work-1", "GitHub", "https://github.com"),
    ("work-2", "Stack Overflow", "https://stackoverflow.com"),
    ("work-3", "Docs.rs", "https://docs.rs"),
    ("work-4", "MDN", "https://developer.mozilla.org"),
];

const NEWS_EN: LinkTable = &[
    ("news-1", "Hacker News", "https://news.ycombinator.com"),
    ("news-2", "The Verge", "https://www.theverge.com"),
    ("news-3", "BBC News", "https://www.bbc.com/news"),
];

const DAILY_ZH: LinkTable = &[
    ("daily-1", "百度", "https://www.baidu.com"),
    ("daily-2", "哔哩哔哩", "https://www.bilibili.com"),
    ("daily-3", "淘宝", "https://www.taobao.com"),
    ("daily-4", "微博", "https://weibo.com"),
];

const WORK_ZH: LinkTable = &[
    ("work-1", "GitHub", "https://github.com"),
    ("work-2", "Gitee", "https://gitee.com"),
    ("work-3", "掘金", "https://juejin.cn"),
    ("work-4", "MDN", "https://developer.mozilla.org/zh-CN"),
];

const NEWS_ZH: LinkTable = &[
    ("news-1", "知乎", "https://www.zhihu.com"),
    ("news-2", "少数派", "https://sspai.com"),
    ("news-3", "36氪", "https://36kr.com"),
];

/// The catalog shown on first start
pub fn default_catalog(language: Language) -> Catalog {
    let tables: [(&str, LinkTable); 3] = match language {
        Language::En => [("daily", DAILY_EN), ("work-dev", WORK_EN), ("news-read", NEWS_EN)],
        Language::Zh => [("daily", DAILY_ZH), ("work-dev", WORK_ZH), ("news-read", NEWS_ZH)],
    };

    let categories = tables
        .iter()
        .zip(CATEGORY_TITLES)
        .map(|((id, links), (en, zh))| Category {
            id: id.to_string(),
            title: match language {
                Language::En => en.to_string(),
                Language::Zh => zh.to_string(),
            },
            links: links
                .iter()
                .map(|(id, title, url)| Link {
                    id: id.to_string(),
                    title: title.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        })
        .collect();

    Catalog::new(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_either_direction() {
        assert_eq!(translate_title("Daily", Language::Zh), Some("日常"));
        assert_eq!(translate_title("日常", Language::En), Some("Daily"));
        assert_eq!(translate_title("日常", Language::Zh), Some("日常"));
        assert_eq!(translate_title("Games", Language::Zh), None);
    }

    #[test]
    fn test_default_catalog_per_language() {
        let en = default_catalog(Language::En);
        let zh = default_catalog(Language::Zh);

        let en_titles: Vec<_> = en.categories.iter().map(|c| c.title.as_str()).collect();
        let zh_titles: Vec<_> = zh.categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(en_titles, vec!["Daily", "Work & Dev", "News & Read"]);
        assert_eq!(zh_titles, vec!["日常", "工作与开发", "新闻与阅读"]);

        assert!(en.validate().is_ok());
        assert!(zh.validate().is_ok());
        assert!(en.categories.iter().all(|c| !c.links.is_empty()));
    }
}
