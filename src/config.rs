use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::providers::ProviderOptions;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub translate_provider: String,       // Translation provider (e.g., "mymemory")
    pub api_url: String,                  // Empty = provider default endpoint
    pub email: String,                    // Optional contact email sent to the provider
    pub source_language: String,
    pub target_language: String,
    pub cache_capacity: usize,
    pub persist_cache: bool,
    pub cache_file: String,
    pub request_timeout_seconds: u64, // 0 = transport default
    pub save_translation_history: bool,
    pub history_file: String,
    pub source_prompt_color: String,      // Color for source prompt
    pub translation_prompt_color: String, // Color for translation output
    pub log_level: String,
}

fn data_file(name: &str) -> String {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("Martins").join(name).to_string_lossy().to_string()
    } else {
        name.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate_provider: "mymemory".to_string(),
            api_url: String::new(),
            email: String::new(),
            source_language: "English".to_string(),
            target_language: "Portuguese".to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            persist_cache: false,
            cache_file: data_file("translation_cache.json"),
            request_timeout_seconds: 0,
            save_translation_history: false,
            history_file: data_file("translation_history.txt"),
            source_prompt_color: "None".to_string(),
            translation_prompt_color: "BrightYellow".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Connection settings for `providers::create_provider`
    pub fn provider_options(&self) -> ProviderOptions {
        let non_empty = |s: &str| {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };

        ProviderOptions {
            api_url: non_empty(&self.api_url),
            email: non_empty(&self.email),
            timeout: if self.request_timeout_seconds > 0 {
                Some(Duration::from_secs(self.request_timeout_seconds))
            } else {
                None
            },
        }
    }
}

pub struct ConfigManager {
    config_path: String,
    config: Arc<Mutex<Config>>,
    last_modified: Arc<Mutex<Option<SystemTime>>>,
}

impl ConfigManager {
    /// Get default configuration file path in the user config directory
    pub fn get_default_config_path() -> Result<PathBuf, Box<dyn Error>> {
        let config_dir = dirs::config_dir()
            .ok_or("Failed to get config directory")?
            .join("Martins");

        // Create directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("martins.conf"))
    }

    pub fn new(config_path: &str) -> Result<Self, Box<dyn Error>> {
        let manager = Self {
            config_path: config_path.to_string(),
            config: Arc::new(Mutex::new(Config::default())),
            last_modified: Arc::new(Mutex::new(None)),
        };

        // Load or create config file
        manager.load_or_create_config()?;

        Ok(manager)
    }

    /// Load configuration from file or create default if not exists
    fn load_or_create_config(&self) -> Result<(), Box<dyn Error>> {
        if Path::new(&self.config_path).exists() {
            self.load_config()?;
        } else {
            self.create_default_config()?;
        }
        Ok(())
    }

    /// Create default configuration file
    fn create_default_config(&self) -> Result<(), Box<dyn Error>> {
        let default_config = Config::default();
        let ini_content = create_ini_content(&default_config);

        if let Some(parent) = Path::new(&self.config_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.config_path, ini_content)?;
        log::info!("Created default configuration file: {}", self.config_path);

        // Update last modified time
        self.update_last_modified_time()?;

        Ok(())
    }

    /// Load configuration from INI file
    fn load_config(&self) -> Result<(), Box<dyn Error>> {
        let content = fs::read_to_string(&self.config_path)?;
        let new_config = parse_config(&content);

        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }

        self.update_last_modified_time()?;

        Ok(())
    }

    /// Get current configuration
    pub fn get_config(&self) -> Config {
        self.config.lock().unwrap().clone()
    }

    /// Display help information (shared by CLI and interactive modes)
    pub fn display_help() {
        println!();
        println!("=== Martins Translator v{} ===", env!("CARGO_PKG_VERSION"));
        println!();
        println!("USAGE:");
        println!("  martins [OPTIONS] [text]");
        println!();

        println!("ARGUMENTS:");
        println!("  <text>    Text to translate (use quotes for phrases with spaces)");
        println!();

        println!("OPTIONS:");
        println!("  -h, --help          Show this help message");
        println!("  -c, --config        Show current configuration");
        println!("  -v, --version       Show version information");
        println!("  -d, --direct <text> Translate without cache or offline fallback");
        println!("  -w, --word <word>   Look up a single word picked from a text");
        println!();

        println!("EXAMPLES:");
        println!("  martins                          Start interactive mode");
        println!("  martins hello                    Translate 'hello'");
        println!("  martins \"How are you?\"           Translate a phrase");
        println!("  martins -d \"Good morning\"        Translate and report any failure");
        println!("  martins -w \"reading,\"            Word lookup");
        println!();

        println!("INTERACTIVE COMMANDS (must start with slash):");
        println!("  /h, /help, /?           - Show this help");
        println!("  /c, /config             - Show current configuration");
        println!("  /d, /direct <text>      - Translate without cache or fallback");
        println!("  /w, /word <word>        - Word lookup");
        println!("  /swap                   - Swap source and target languages");
        println!("  /stats                  - Show translation cache statistics");
        println!("  /cache clear            - Drop all cached translations");
        println!("  /clear, /cls            - Clear screen");
        println!("  /q, /quit, /exit        - Exit program");
        println!();

        println!("CONFIGURATION:");
        if let Ok(config_path) = ConfigManager::get_default_config_path() {
            println!("  Config file: {}", config_path.display());
        } else {
            println!("  Config file: martins.conf");
        }
        println!();
        println!("  Edit 'martins.conf' to change settings:");
        println!("  - SourceLanguage / TargetLanguage: names or codes (English, pt, ...)");
        println!("  - CacheCapacity: maximum number of cached translations");
        println!("  - PersistCache: keep the cache between runs");
        println!("  - SaveTranslationHistory: save all translations to file");
        println!("  - LogLevel: error, warn, info, debug or trace (RUST_LOG overrides)");
        println!();

        println!("FEATURES:");
        println!("- MyMemory translation API");
        println!("- Repeated lookups are answered from cache");
        println!("- Offline English -> Portuguese word list when the service is down");
        println!("- Configuration hot-reload (changes take effect immediately)");
        println!("- Translation history logging");
        println!("===============================================");
        println!();
    }

    /// Display current configuration
    pub fn display_config(&self) -> Result<(), Box<dyn Error>> {
        // Reload config to get latest values
        self.check_and_reload()?;
        let config = self.get_config();
        let (source_code, target_code) = self.get_language_codes();

        let enabled = |flag: bool| if flag { "Enabled" } else { "Disabled" };

        println!();
        println!("=== Current Configuration ===");
        println!("Translation Provider: {}", config.translate_provider);
        println!(
            "API URL: {}",
            if config.api_url.trim().is_empty() {
                "(provider default)"
            } else {
                config.api_url.trim()
            }
        );
        println!(
            "Request Timeout: {}",
            if config.request_timeout_seconds == 0 {
                "Transport default".to_string()
            } else {
                format!("{} seconds", config.request_timeout_seconds)
            }
        );
        println!();
        println!(
            "Source Language: {} ({})",
            config.source_language, source_code
        );
        println!(
            "Target Language: {} ({})",
            config.target_language, target_code
        );
        println!();
        println!("Cache Capacity: {} entries", config.cache_capacity);
        println!("Persist Cache: {}", enabled(config.persist_cache));
        if config.persist_cache {
            println!("Cache File: {}", config.cache_file);
        }
        println!();
        println!(
            "Save Translation History: {}",
            enabled(config.save_translation_history)
        );
        println!("History File: {}", config.history_file);
        println!("Log Level: {}", config.log_level);
        println!();
        println!("Config file: {}", self.config_path);
        println!("Edit this file to change settings ([Cache] and [Logging] need a restart)");
        println!("============================");
        println!();

        Ok(())
    }

    /// Check if config file was modified and reload if necessary
    pub fn check_and_reload(&self) -> Result<bool, Box<dyn Error>> {
        if !Path::new(&self.config_path).exists() {
            return Ok(false);
        }

        let metadata = fs::metadata(&self.config_path)?;
        let current_modified = metadata.modified()?;

        let should_reload = {
            let last_modified = self.last_modified.lock().unwrap();
            match *last_modified {
                Some(last) => current_modified > last,
                None => true,
            }
        };

        if should_reload {
            self.load_config()?;
            log::debug!("Reloaded configuration from {}", self.config_path);
            return Ok(true);
        }

        Ok(false)
    }

    /// Update last modified time
    fn update_last_modified_time(&self) -> Result<(), Box<dyn Error>> {
        if Path::new(&self.config_path).exists() {
            let metadata = fs::metadata(&self.config_path)?;
            let modified = metadata.modified()?;

            if let Ok(mut last_modified) = self.last_modified.lock() {
                *last_modified = Some(modified);
            }
        }
        Ok(())
    }

    /// Convert language name to MyMemory language code
    pub fn language_to_code(language: &str) -> &str {
        match language.trim().to_lowercase().as_str() {
            "english" => "en",
            "portuguese" => "pt",
            "spanish" => "es",
            "french" => "fr",
            "german" => "de",
            "italian" => "it",
            "russian" => "ru",
            "chinese" => "zh",
            "japanese" => "ja",
            "korean" => "ko",
            "dutch" => "nl",
            "polish" => "pl",
            "turkish" => "tr",
            "arabic" => "ar",
            "hindi" => "hi",
            _ => language.trim(), // Return as-is if not found (might be a code already)
        }
    }

    /// Get language codes for translation
    pub fn get_language_codes(&self) -> (String, String) {
        let config = self.get_config();
        let source_code = Self::language_to_code(&config.source_language);
        let target_code = Self::language_to_code(&config.target_language);

        (source_code.to_string(), target_code.to_string())
    }

    /// Parse color name to colored::Color enum
    /// Returns None for "None" or empty string (no color)
    pub fn parse_color(color_name: &str) -> Option<colored::Color> {
        let color_lower = color_name.trim().to_lowercase();

        // Handle "None" or empty string as no color
        if color_lower.is_empty() || color_lower == "none" {
            return None;
        }

        match color_lower.as_str() {
            "black" => Some(colored::Color::Black),
            "red" => Some(colored::Color::Red),
            "green" => Some(colored::Color::Green),
            "yellow" => Some(colored::Color::Yellow),
            "blue" => Some(colored::Color::Blue),
            "magenta" => Some(colored::Color::Magenta),
            "cyan" => Some(colored::Color::Cyan),
            "white" => Some(colored::Color::White),
            "brightblack" | "bright_black" => Some(colored::Color::BrightBlack),
            "brightred" | "bright_red" => Some(colored::Color::BrightRed),
            "brightgreen" | "bright_green" => Some(colored::Color::BrightGreen),
            "brightyellow" | "bright_yellow" => Some(colored::Color::BrightYellow),
            "brightblue" | "bright_blue" => Some(colored::Color::BrightBlue),
            "brightmagenta" | "bright_magenta" => Some(colored::Color::BrightMagenta),
            "brightcyan" | "bright_cyan" => Some(colored::Color::BrightCyan),
            "brightwhite" | "bright_white" => Some(colored::Color::BrightWhite),
            _ => None, // Return None for unknown colors
        }
    }
}

/// Create INI format content
fn create_ini_content(config: &Config) -> String {
    format!(
        r#"; Martins Translator Configuration File
; Translates text for English learners using the MyMemory API.
;
; In interactive mode changes take effect immediately (no restart required),
; except for [Cache] and [Logging] which are read at startup.

[Provider]
; Translation service provider
; Supported values: mymemory
TranslateProvider = {}

; Endpoint override. Leave empty to use the public MyMemory endpoint.
ApiUrl = {}

; Contact email sent with each request. MyMemory grants a larger free
; daily quota to requests that include a valid email. Leave empty to skip.
Email = {}

[Translation]
; Source and target languages, as names or two-letter codes
; Names: English, Portuguese, Spanish, French, German, Italian, Russian,
; Chinese, Japanese, Korean, Dutch, Polish, Turkish, Arabic, Hindi
; The offline word list only covers English -> Portuguese.
SourceLanguage = {}
TargetLanguage = {}

[Cache]
; Maximum number of translations kept in memory.
; The least recently used entry is dropped when the cache is full.
CacheCapacity = {}

; Save the cache to CacheFile on exit and load it on the next start
PersistCache = {}
CacheFile = {}

[Network]
; Request timeout in seconds. 0 = use the HTTP client's default.
RequestTimeoutSeconds = {}

[History]
; Save translation history to file
; History includes original text, translation, language direction, and timestamp
SaveTranslationHistory = {}

; File where translation history will be saved
HistoryFile = {}

[Colors]
; Supported values: Black, Red, Green, Yellow, Blue, Magenta, Cyan, White,
; BrightBlack, BrightRed, BrightGreen, BrightYellow, BrightBlue, BrightMagenta, BrightCyan, BrightWhite
; Use "None" to disable color
SourcePromptColor = {}
TranslationPromptColor = {}

[Logging]
; Diagnostic output on stderr: error, warn, info, debug, trace
; The RUST_LOG environment variable takes precedence.
LogLevel = {}
"#,
        config.translate_provider,
        config.api_url,
        config.email,
        config.source_language,
        config.target_language,
        config.cache_capacity,
        config.persist_cache,
        config.cache_file,
        config.request_timeout_seconds,
        config.save_translation_history,
        config.history_file,
        config.source_prompt_color,
        config.translation_prompt_color,
        config.log_level,
    )
}

/// Parse INI format content
fn parse_ini(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current_section: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        // Section header
        if line.starts_with('[') && line.ends_with(']') {
            let section_name = line[1..line.len() - 1].trim().to_string();
            current_section = Some(section_name.clone());
            sections.entry(section_name).or_default();
        }
        // Key-value pair
        else if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim().to_string();
            let value = line[eq_pos + 1..].trim().to_string();

            if let Some(section_name) = &current_section {
                if let Some(section) = sections.get_mut(section_name) {
                    section.insert(key, value);
                }
            }
        }
    }

    sections
}

/// Build a `Config` from INI text; missing or unparsable keys keep their defaults
fn parse_config(content: &str) -> Config {
    let parsed = parse_ini(content);
    let defaults = Config::default();

    let get = |section: &str, key: &str| -> Option<String> {
        parsed
            .get(section)
            .and_then(|s| s.get(key))
            .cloned()
    };
    let get_bool = |section: &str, key: &str, default: bool| -> bool {
        get(section, key)
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(default)
    };

    let cache_capacity = get("Cache", "CacheCapacity")
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(defaults.cache_capacity);

    let request_timeout_seconds = get("Network", "RequestTimeoutSeconds")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(defaults.request_timeout_seconds);

    Config {
        translate_provider: get("Provider", "TranslateProvider")
            .unwrap_or(defaults.translate_provider),
        api_url: get("Provider", "ApiUrl").unwrap_or(defaults.api_url),
        email: get("Provider", "Email").unwrap_or(defaults.email),
        source_language: get("Translation", "SourceLanguage")
            .unwrap_or(defaults.source_language),
        target_language: get("Translation", "TargetLanguage")
            .unwrap_or(defaults.target_language),
        cache_capacity,
        persist_cache: get_bool("Cache", "PersistCache", defaults.persist_cache),
        cache_file: get("Cache", "CacheFile").unwrap_or(defaults.cache_file),
        request_timeout_seconds,
        save_translation_history: get_bool(
            "History",
            "SaveTranslationHistory",
            defaults.save_translation_history,
        ),
        history_file: get("History", "HistoryFile").unwrap_or(defaults.history_file),
        source_prompt_color: get("Colors", "SourcePromptColor")
            .unwrap_or(defaults.source_prompt_color),
        translation_prompt_color: get("Colors", "TranslationPromptColor")
            .unwrap_or(defaults.translation_prompt_color),
        log_level: get("Logging", "LogLevel").unwrap_or(defaults.log_level),
    }
}
