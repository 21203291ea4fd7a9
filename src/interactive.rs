// interactive.rs
use crate::config::{Config, ConfigManager};
use crate::error::TranslateError;
use crate::history;
use crate::providers::ProviderOptions;
use crate::translator::{clean_word, Translator};
use colored::Colorize;
use std::error::Error;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum InteractiveCommand {
    Skip,
    Help,
    Config,
    Stats,
    ClearCache,
    Swap,
    ClearScreen,
    Quit,
    Direct(String),
    Word(String),
    Translate(String),
    Unknown(String),
}

impl InteractiveCommand {
    pub fn parse(input: &str) -> Self {
        let text = input.trim();
        if text.is_empty() {
            return InteractiveCommand::Skip;
        }

        if !text.starts_with('/') {
            return InteractiveCommand::Translate(text.to_string());
        }

        let (command, argument) = match text.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (text, ""),
        };

        match command.to_lowercase().as_str() {
            "/h" | "/help" | "/?" => InteractiveCommand::Help,
            "/c" | "/config" => InteractiveCommand::Config,
            "/stats" => InteractiveCommand::Stats,
            "/cache" if argument.eq_ignore_ascii_case("clear") => InteractiveCommand::ClearCache,
            "/swap" => InteractiveCommand::Swap,
            "/clear" | "/cls" => InteractiveCommand::ClearScreen,
            "/q" | "/quit" | "/exit" => InteractiveCommand::Quit,
            "/d" | "/direct" => InteractiveCommand::Direct(argument.to_string()),
            "/w" | "/word" => InteractiveCommand::Word(argument.to_string()),
            _ => InteractiveCommand::Unknown(text.to_string()),
        }
    }
}

pub struct InteractiveMode {
    translator: RwLock<Translator>,
    // provider name and options the current translator was built with
    provider_settings: Mutex<(String, ProviderOptions)>,
    config_manager: Arc<ConfigManager>,
    should_exit: AtomicBool,
    swapped: AtomicBool,
}

impl InteractiveMode {
    pub fn new(config_manager: Arc<ConfigManager>) -> Result<Self, Box<dyn Error>> {
        let config = config_manager.get_config();
        let translator = Translator::from_config(&config)?;
        Ok(Self {
            translator: RwLock::new(translator),
            provider_settings: Mutex::new((
                config.translate_provider.clone(),
                config.provider_options(),
            )),
            config_manager,
            should_exit: AtomicBool::new(false),
            swapped: AtomicBool::new(false),
        })
    }

    fn translator(&self) -> Translator {
        self.translator.read().unwrap().clone()
    }

    /// Rebuild the provider if the `[Provider]` or `[Network]` settings changed.
    /// The cache carries over to the new translator.
    fn refresh_provider(&self, config: &Config) -> Result<bool, TranslateError> {
        let settings = (config.translate_provider.clone(), config.provider_options());
        let mut current = self.provider_settings.lock().unwrap();
        if *current == settings {
            return Ok(false);
        }

        let rebuilt = self.translator().with_provider_from(config)?;
        *self.translator.write().unwrap() = rebuilt;
        *current = settings;
        Ok(true)
    }

    /// Language names and codes for this session, honoring `/swap`
    fn session_languages(&self, config: &Config) -> (String, String, String, String) {
        let (source_code, target_code) = self.config_manager.get_language_codes();
        let source_name = config.source_language.clone();
        let target_name = config.target_language.clone();

        if self.swapped.load(Ordering::Relaxed) {
            (target_name, target_code, source_name, source_code)
        } else {
            (source_name, source_code, target_name, target_code)
        }
    }

    /// Start interactive translation mode
    pub async fn start(&self) -> Result<(), Box<dyn Error>> {
        println!("=== Martins Translator v{} ===", env!("CARGO_PKG_VERSION"));
        println!("Type text to translate, /help for commands, /quit to exit");
        println!();

        loop {
            if self.should_exit.load(Ordering::Relaxed) {
                break;
            }

            // Check if config file was modified and reload if necessary
            match self.config_manager.check_and_reload() {
                Ok(true) => match self.refresh_provider(&self.config_manager.get_config()) {
                    Ok(true) => log::info!("Translation provider reconfigured"),
                    Ok(false) => {}
                    Err(e) => log::warn!("Keeping previous translation provider: {}", e),
                },
                Ok(false) => {}
                Err(e) => log::warn!("Config reload error: {}", e),
            }
            let config = self.config_manager.get_config();
            let (source_name, _, _, _) = self.session_languages(&config);

            // Show prompt
            let prompt = format!("[{}]: ", source_name);
            match ConfigManager::parse_color(&config.source_prompt_color) {
                Some(color) => print!("{}", prompt.color(color)),
                None => print!("{}", prompt),
            }
            io::stdout().flush()?;

            let mut input = String::new();
            match io::stdin().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D / closed pipe)
                    println!();
                    break;
                }
                Ok(_) => {
                    if let Err(e) = self.handle_line(&input, &config).await {
                        println!("{}", e);
                    }
                }
                Err(e) => {
                    println!("Input error: {}", e);
                    continue;
                }
            }
        }

        self.translator()
            .persist_cache(&self.config_manager.get_config());
        println!("Goodbye!");

        Ok(())
    }

    async fn handle_line(&self, input: &str, config: &Config) -> Result<(), Box<dyn Error>> {
        match InteractiveCommand::parse(input) {
            InteractiveCommand::Skip => {}
            InteractiveCommand::Help => ConfigManager::display_help(),
            InteractiveCommand::Config => self.config_manager.display_config()?,
            InteractiveCommand::Stats => self.show_stats(),
            InteractiveCommand::ClearCache => {
                let translator = self.translator();
                if translator.cache().is_empty() {
                    println!("Translation cache is already empty");
                } else {
                    translator.cache().clear();
                    println!("Translation cache cleared");
                }
                println!();
            }
            InteractiveCommand::Swap => {
                self.swapped.fetch_xor(true, Ordering::Relaxed);
                let (source_name, source_code, target_name, target_code) =
                    self.session_languages(config);
                println!(
                    "Now translating {} ({}) -> {} ({})",
                    source_name, source_code, target_name, target_code
                );
                println!();
            }
            InteractiveCommand::ClearScreen => {
                print!("\x1B[2J\x1B[1;1H");
                io::stdout().flush()?;
            }
            InteractiveCommand::Quit => {
                self.should_exit.store(true, Ordering::SeqCst);
            }
            InteractiveCommand::Direct(text) => {
                if text.is_empty() {
                    println!("Usage: /direct <text>");
                } else {
                    self.translate_interactive_text(&text, config, true).await?;
                }
            }
            InteractiveCommand::Word(word) => match clean_word(&word) {
                Some(cleaned) => {
                    println!("[Word]: {}", cleaned);
                    self.translate_interactive_text(&cleaned, config, false)
                        .await?;
                }
                None => println!("Invalid word for translation."),
            },
            InteractiveCommand::Translate(text) => {
                self.translate_interactive_text(&text, config, false).await?;
            }
            InteractiveCommand::Unknown(command) => {
                println!("Unknown command: {} (type /help for commands)", command);
            }
        }

        Ok(())
    }

    fn show_stats(&self) {
        let translator = self.translator();
        let stats = translator.cache().stats();
        println!();
        println!("=== Translation Cache ===");
        println!("Provider: {}", translator.provider_name());
        println!("Entries: {} / {}", stats.entries, stats.capacity);
        println!("Hits: {}", stats.hits);
        println!("Misses: {}", stats.misses);
        println!("=========================");
        println!();
    }

    /// Translate text in interactive mode
    async fn translate_interactive_text(
        &self,
        text: &str,
        config: &Config,
        direct: bool,
    ) -> Result<(), String> {
        let (_, source_code, target_name, target_code) = self.session_languages(config);
        let translator = self.translator();

        // (text, whether it is a real translation worth recording)
        let (translated, available) = if direct {
            let translated = translator
                .translate_direct(text, &source_code, &target_code)
                .await
                .map_err(|e| format!("Translation failed: {}", e))?;
            (translated, true)
        } else {
            let translation = translator
                .translate(text, &source_code, &target_code)
                .await
                .map_err(|e| format!("Translation error: {}", e))?;
            let available = translation.is_available();
            (translation.text, available)
        };

        let label = format!("[{}]:", target_name);
        match ConfigManager::parse_color(&config.translation_prompt_color) {
            Some(color) => println!("{} {}", label.color(color), translated),
            None => println!("{} {}", label, translated),
        }
        println!(); // Add spacing

        if config.save_translation_history && available {
            if let Err(e) =
                history::append_entry(&config.history_file, text, &translated, &source_code, &target_code)
            {
                println!("History save error: {}", e);
            }
        }

        Ok(())
    }
}
