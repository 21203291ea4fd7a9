use crate::config::{Config, ConfigManager};
use crate::history;
use crate::translator::{clean_word, Translator};
use colored::Colorize;
use std::error::Error;
use std::sync::Arc;

/// What a command line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Help,
    Config,
    Version,
    Translate(String),
    Direct(String),
    Word(String),
    Missing(&'static str),
}

impl CliCommand {
    /// Interpret `args` as received by `main` (program name first)
    pub fn parse(args: &[String]) -> Self {
        if args.len() < 2 {
            return CliCommand::Missing("No arguments provided");
        }

        let rest = || args[2..].join(" ");

        match args[1].as_str() {
            "-h" | "--help" => CliCommand::Help,
            "-c" | "--config" => CliCommand::Config,
            "-v" | "--version" => CliCommand::Version,
            "-d" | "--direct" => {
                if args.len() < 3 {
                    CliCommand::Missing("No text provided for direct translation")
                } else {
                    CliCommand::Direct(rest())
                }
            }
            "-w" | "--word" => {
                if args.len() < 3 {
                    CliCommand::Missing("No word provided for lookup")
                } else {
                    CliCommand::Word(rest())
                }
            }
            // Treat as text to translate
            _ => CliCommand::Translate(args[1..].join(" ")),
        }
    }
}

pub struct CliHandler {
    translator: Translator,
    config_manager: Arc<ConfigManager>,
}

impl CliHandler {
    pub fn new(config_manager: Arc<ConfigManager>) -> Result<Self, Box<dyn Error>> {
        let translator = Translator::from_config(&config_manager.get_config())?;
        Ok(Self::with_translator(translator, config_manager))
    }

    pub fn with_translator(translator: Translator, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            translator,
            config_manager,
        }
    }

    /// Display CLI help information
    pub fn show_help() {
        ConfigManager::display_help();
    }

    /// Show version information
    pub fn show_version() {
        println!("Martins Translator v{}", env!("CARGO_PKG_VERSION"));
        println!("Terminal translator for English learners");
        println!();
    }

    /// Process CLI arguments and determine action.
    /// Errors are not printed here; `main` reports them and exits non-zero.
    pub async fn process_args(&self, args: Vec<String>) -> Result<(), Box<dyn Error>> {
        let result = match CliCommand::parse(&args) {
            CliCommand::Help => {
                Self::show_help();
                Ok(())
            }
            CliCommand::Config => self.config_manager.display_config(),
            CliCommand::Version => {
                Self::show_version();
                Ok(())
            }
            CliCommand::Translate(text) => self.translate_text(&text).await,
            CliCommand::Direct(text) => self.translate_direct(&text).await,
            CliCommand::Word(word) => self.lookup_word(&word).await,
            CliCommand::Missing(message) => {
                Err(format!("{}\nUse --help for usage information", message).into())
            }
        };

        self.translator
            .persist_cache(&self.config_manager.get_config());

        result
    }

    /// Best-effort translation: always prints something
    pub async fn translate_text(&self, text: &str) -> Result<(), Box<dyn Error>> {
        if text.trim().is_empty() {
            return Err("Empty text provided\nUsage: martins <text to translate>".into());
        }

        // Load current configuration
        self.config_manager.check_and_reload().ok(); // Ignore errors, use defaults
        let config = self.config_manager.get_config();
        let (source_code, target_code) = self.config_manager.get_language_codes();

        let translation = self
            .translator
            .translate(text, &source_code, &target_code)
            .await?;
        self.print_translation(&translation.text, &config);
        // the placeholder is printed but never recorded
        if translation.is_available() {
            self.save_history(text, &translation.text, &source_code, &target_code, &config);
        }

        Ok(())
    }

    /// Translation that fails loudly when the service does
    pub async fn translate_direct(&self, text: &str) -> Result<(), Box<dyn Error>> {
        self.config_manager.check_and_reload().ok();
        let config = self.config_manager.get_config();
        let (source_code, target_code) = self.config_manager.get_language_codes();

        match self
            .translator
            .translate_direct(text, &source_code, &target_code)
            .await
        {
            Ok(translated) => {
                self.print_translation(&translated, &config);
                self.save_history(text, &translated, &source_code, &target_code, &config);
                Ok(())
            }
            Err(e) => Err(format!("Translation failed: {}", e).into()),
        }
    }

    /// Single word lookup, as when a word is picked out of a reading text
    pub async fn lookup_word(&self, word: &str) -> Result<(), Box<dyn Error>> {
        let cleaned = match clean_word(word) {
            Some(cleaned) => cleaned,
            None => return Err(format!("Invalid word for translation: {}", word.trim()).into()),
        };

        self.translate_text(&cleaned).await
    }

    fn print_translation(&self, translated: &str, config: &Config) {
        match ConfigManager::parse_color(&config.translation_prompt_color) {
            Some(color) => println!("{}", translated.color(color)),
            None => println!("{}", translated),
        }
    }

    fn save_history(
        &self,
        original: &str,
        translated: &str,
        source_code: &str,
        target_code: &str,
        config: &Config,
    ) {
        if !config.save_translation_history {
            return;
        }

        if let Err(e) = history::append_entry(
            &config.history_file,
            original.trim(),
            translated,
            source_code,
            target_code,
        ) {
            eprintln!("History save error: {}", e);
        }
    }
}
