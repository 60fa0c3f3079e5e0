use astralis::application::StartPage;
use astralis::backup;
use astralis::completion::{self, SuggestionSource};
use astralis::config::{self, AppConfig};
use astralis::reorder::DragItem;
use astralis::settings::SettingChange;
use astralis::storage::SqliteStore;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
Usage: astralis [-y|--yes] <command> [args...]

Commands:
  list                                  Show categories and links
  engines                               Show search engines
  settings                              Show settings as JSON
  search <query...>                     Print the search URL for a query
  suggest-url <query...>                Print the suggestion endpoint URL
  suggest <query...>                    Print suggestions from a response on stdin
  add-category <title>
  delete-category <id>
  add-link <category> <title> <url>
  delete-link <category> <link>
  move-category <source> <target>
  move-link <category> <source> <target>
  add-engine <name> <url-template> [icon]
  delete-engine <id>
  select-engine <id>
  set <key> <json-value>                e.g. set theme '\"dark\"'
  export [path]                         Write a backup (default: dated file)
  import <path>                         Restore a backup";

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", config::APP_NAME, config::APP_VERSION);

    let (assume_yes, args) = split_flags(std::env::args().skip(1).collect());

    if args.is_empty() || args[0] == "-h" || args[0] == "--help" {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let app_config = AppConfig::load();
    let page = match StartPage::open_with_config(&app_config) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("Failed to open store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut cli = Cli {
        page,
        config: app_config,
        assume_yes,
    };
    match cli.run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Split leading `-y`/`--yes` flags from the command and its arguments
fn split_flags(mut args: Vec<String>) -> (bool, Vec<String>) {
    let flags = args
        .iter()
        .take_while(|a| a.as_str() == "-y" || a.as_str() == "--yes")
        .count();
    args.drain(..flags);
    (flags > 0, args)
}

struct Cli {
    page: StartPage<SqliteStore>,
    config: AppConfig,
    assume_yes: bool,
}

/// A suggestion response piped in on stdin, e.g. from `curl`
struct StdinSource;

impl SuggestionSource for StdinSource {
    fn fetch(&self, _query: &str) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let mut body = String::new();
        io::stdin().lock().read_to_string(&mut body)?;
        Ok(completion::parse_suggestions(&body))
    }
}

impl Cli {
    fn run(&mut self, args: &[String]) -> Result<(), String> {
        let command = args[0].as_str();
        let rest: Vec<&str> = args[1..].iter().map(String::as_str).collect();

        match (command, rest.as_slice()) {
            ("list", []) => self.list(),
            ("engines", []) => self.list_engines(),
            ("settings", []) => {
                let json = serde_json::to_string_pretty(self.page.settings())
                    .map_err(|e| e.to_string())?;
                println!("{}", json);
            }
            ("search", words) if !words.is_empty() => {
                let query = words.join(" ");
                match self.page.search_url(&query) {
                    Some(url) => println!("{}", url),
                    None => return Err("Empty query".to_string()),
                }
            }
            ("suggest-url", words) if !words.is_empty() => {
                println!("{}", completion::suggestion_url(&words.join(" ")));
            }
            ("suggest", words) if !words.is_empty() => {
                let query = words.join(" ");
                let list = completion::suggestions_for(&self.config, &StdinSource, &query);
                for item in list.items() {
                    println!("{}", item);
                }
            }
            ("add-category", [title]) => {
                let result = self.page.add_category(title);
                let id = self.reject(result)?;
                println!("{}", id);
            }
            ("delete-category", [id]) => {
                if self.confirm(self.page.messages().delete_category_confirm)
                    && !self.page.delete_category(id)
                {
                    return Err(format!("No category '{}'", id));
                }
            }
            ("add-link", [category, title, url]) => {
                let result = self.page.add_link(category, title, url);
                let id = self.reject(result)?;
                println!("{}", id);
            }
            ("delete-link", [category, link]) => {
                if self.confirm(self.page.messages().delete_link_confirm)
                    && !self.page.delete_link(category, link)
                {
                    return Err(format!("No link '{}' in '{}'", link, category));
                }
            }
            ("move-category", [source, target]) => {
                self.page.begin_drag(DragItem::category(*source));
                self.page.drop_on(&DragItem::category(*target));
            }
            ("move-link", [category, source, target]) => {
                self.page.begin_drag(DragItem::link(*category, *source));
                self.page.drop_on(&DragItem::link(*category, *target));
            }
            ("add-engine", [name, url]) => {
                let result = self.page.add_engine(name, url, "");
                let id = self.reject(result)?;
                println!("{}", id);
            }
            ("add-engine", [name, url, icon]) => {
                let result = self.page.add_engine(name, url, icon);
                let id = self.reject(result)?;
                println!("{}", id);
            }
            ("delete-engine", [id]) => {
                if self.page.engines().len() <= 1 {
                    // Report the rejection without prompting first
                    let result = self.page.delete_engine(id);
                    self.reject(result)?;
                } else if self.confirm(self.page.messages().delete_engine_confirm) {
                    let result = self.page.delete_engine(id);
                    self.reject(result)?;
                }
            }
            ("select-engine", [id]) => {
                if !self.page.select_engine(id) {
                    return Err(format!("No engine '{}'", id));
                }
            }
            ("set", [key, value]) => {
                let value: serde_json::Value = serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
                let change = SettingChange::from_json(key, &value)
                    .ok_or_else(|| format!("Invalid setting '{}' = {}", key, value))?;
                self.page.update_setting(change);
            }
            ("export", []) => self.export(PathBuf::from(backup::backup_filename_today()))?,
            ("export", [path]) => self.export(PathBuf::from(path))?,
            ("import", [path]) => self.import(PathBuf::from(path))?,
            _ => return Err(USAGE.to_string()),
        }

        Ok(())
    }

    fn list(&self) {
        for category in &self.page.catalog().categories {
            println!("{}  [{}]", category.title, category.id);
            for link in &category.links {
                println!("    {}  {}  [{}]", link.title, link.url, link.id);
            }
        }
    }

    fn list_engines(&self) {
        let selected = self.page.selected_engine().id.clone();
        for engine in self.page.engines().engines() {
            let marker = if engine.id == selected { "*" } else { " " };
            println!("{} {}  {}  [{}]", marker, engine.name, engine.search_url, engine.id);
        }
    }

    fn export(&self, path: PathBuf) -> Result<(), String> {
        backup::export_to_file(
            &path,
            self.page.catalog(),
            self.page.engines(),
            self.page.settings(),
        )
        .map_err(|e| e.to_string())?;
        println!("{}", path.display());
        Ok(())
    }

    fn import(&mut self, path: PathBuf) -> Result<(), String> {
        if !self.confirm(self.page.messages().import_confirm) {
            return Ok(());
        }

        match backup::import_from_file(&path) {
            Ok(restore) => {
                self.page.apply_restore(restore);
                println!("{}", self.page.messages().done);
                Ok(())
            }
            Err(e) => {
                log::warn!("Import of {:?} failed: {}", path, e);
                Err(self.page.messages().invalid_backup.to_string())
            }
        }
    }

    /// Turn a rejection into its localized message
    fn reject<T>(&self, result: Result<T, astralis::i18n::Rejection>) -> Result<T, String> {
        result.map_err(|reason| reason.message(self.page.settings().language).to_string())
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
