use crate::cache::{CacheKey, TranslationCache};
use crate::config::Config;
use crate::error::{FailureKind, TranslateError};
use crate::fallback::FallbackDictionary;
use crate::providers::{create_provider, TranslationProvider};
use std::path::Path;
use std::sync::Arc;

/// Where a `translate` result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationOrigin {
    Remote,
    Cached,
    Fallback,
    /// Neither the service nor the word list had an answer
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    pub origin: TranslationOrigin,
}

impl Translation {
    fn new(text: impl Into<String>, origin: TranslationOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    /// False for the placeholder
    pub fn is_available(&self) -> bool {
        self.origin != TranslationOrigin::Unavailable
    }
}

/// Translation service shared by CLI and interactive modes.
///
/// `translate` is the best-effort path: cached, falls back to the offline word
/// list and finally to a placeholder, never surfacing remote failures.
/// `translate_direct` skips the cache and reports every failure.
#[derive(Clone)]
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    cache: Arc<TranslationCache>,
    fallback: Arc<FallbackDictionary>,
}

impl Translator {
    pub fn new(provider: Arc<dyn TranslationProvider>, cache: Arc<TranslationCache>) -> Self {
        Self {
            provider,
            cache,
            fallback: Arc::new(FallbackDictionary::new()),
        }
    }

    /// Build the provider and cache described by the configuration,
    /// restoring a persisted cache when enabled
    pub fn from_config(config: &Config) -> Result<Self, TranslateError> {
        let provider = create_provider(&config.translate_provider, &config.provider_options())?;
        let cache = Arc::new(TranslationCache::new(config.cache_capacity));

        if config.persist_cache {
            match cache.load_from_file(Path::new(&config.cache_file)) {
                Ok(count) => log::info!("Loaded {} cached translations from {}", count, config.cache_file),
                Err(e) => log::warn!("Ignoring unreadable cache file {}: {}", config.cache_file, e),
            }
        }

        Ok(Self::new(Arc::from(provider), cache))
    }

    /// Same cache and word list, provider rebuilt from `config`
    pub fn with_provider_from(&self, config: &Config) -> Result<Self, TranslateError> {
        let provider = create_provider(&config.translate_provider, &config.provider_options())?;
        Ok(Self {
            provider: Arc::from(provider),
            cache: Arc::clone(&self.cache),
            fallback: Arc::clone(&self.fallback),
        })
    }

    /// Write the cache back to disk if persistence is enabled
    pub fn persist_cache(&self, config: &Config) {
        if !config.persist_cache {
            return;
        }

        match self.cache.save_to_file(Path::new(&config.cache_file)) {
            Ok(count) => log::info!("Saved {} cached translations to {}", count, config.cache_file),
            Err(e) => log::warn!("Failed to save cache to {}: {}", config.cache_file, e),
        }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Cached translation with offline fallback.
    /// Only blank input is reported as an error.
    pub async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptyText);
        }

        let key = CacheKey::new(text, from, to);
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Cache hit for {}|{}", from, to);
            return Ok(Translation::new(cached, TranslationOrigin::Cached));
        }

        match self.fetch(text, from, to).await {
            Ok(translation) => {
                self.cache.insert(key, translation.clone());
                Ok(Translation::new(translation, TranslationOrigin::Remote))
            }
            Err(e) => {
                match e.kind() {
                    FailureKind::Semantic => {
                        log::warn!("Translation service rejected {}|{} request: {}", from, to, e)
                    }
                    _ => log::warn!("Translation service unreachable for {}|{}: {}", from, to, e),
                }

                // NOTE: the cache key keeps the original casing while the word list
                // is looked up lowercased, so "Hello" and "hello" share a fallback
                // but are fetched separately while the service is up.
                if is_single_word(text) {
                    if let Some(word) = self.fallback.lookup(text, from, to) {
                        log::info!("Using offline dictionary entry for '{}'", text);
                        self.cache.insert(key, word.to_string());
                        return Ok(Translation::new(word, TranslationOrigin::Fallback));
                    }
                }

                Ok(Translation::new(
                    unavailable_message(text),
                    TranslationOrigin::Unavailable,
                ))
            }
        }
    }

    /// Uncached translation that reports failures to the caller
    pub async fn translate_direct(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptyText);
        }

        self.fetch(text, from, to).await.map_err(|e| {
            log::warn!("Direct translation {}|{} failed ({}): {}", from, to, e.kind().as_str(), e);
            e
        })
    }

    async fn fetch(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError> {
        let raw = self.provider.translate_text(text, from, to).await?;
        Ok(normalize_translation(&raw))
    }
}

/// Trim and upper-case the first character
pub fn normalize_translation(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returned by `translate` when neither the service nor the word list can help
pub fn unavailable_message(text: &str) -> String {
    format!("Translation unavailable for \"{}\"", text)
}

/// Check if text is a single word (no spaces, punctuation at edges allowed)
pub fn is_single_word(text: &str) -> bool {
    let cleaned = text.trim_matches(|c: char| !c.is_alphabetic());
    !cleaned.is_empty()
        && !cleaned.contains(' ')
        && cleaned
            .chars()
            .all(|c| c.is_alphabetic() || c == '-' || c == '\'')
}

/// Prepare a word picked out of running text for lookup:
/// drop everything but word characters and lowercase it.
/// Returns `None` when fewer than two characters remain.
pub fn clean_word(word: &str) -> Option<String> {
    let cleaned: String = word
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(|c| c.to_lowercase())
        .collect();

    if cleaned.chars().count() < 2 {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockProvider {
        reply: Mutex<Result<String, TranslateError>>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Ok(text.to_string())),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: TranslateError) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Err(err)),
                calls: AtomicUsize::new(0),
            })
        }

        fn set_reply(&self, reply: Result<String, TranslateError>) {
            *self.reply.lock().unwrap() = reply;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationProvider for MockProvider {
        async fn translate_text(
            &self,
            _text: &str,
            _from: &str,
            _to: &str,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.lock().unwrap().clone()
        }

        fn name(&self) -> &str {
            "Mock"
        }
    }

    fn translator_with(provider: Arc<MockProvider>) -> Translator {
        Translator::new(provider, Arc::new(TranslationCache::new(16)))
    }

    fn http_failure() -> TranslateError {
        TranslateError::HttpStatus(503)
    }

    #[tokio::test]
    async fn test_second_call_is_cache_hit() {
        let provider = MockProvider::replying("olá");
        let translator = translator_with(provider.clone());

        let first = translator.translate("hello", "en", "pt").await.unwrap();
        let second = translator.translate("hello", "en", "pt").await.unwrap();

        assert_eq!(first, Translation::new("Olá", TranslationOrigin::Remote));
        assert_eq!(second, Translation::new("Olá", TranslationOrigin::Cached));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_shares_cache_entry() {
        let provider = MockProvider::replying("olá");
        let translator = translator_with(provider.clone());

        translator.translate("hello", "en", "pt").await.unwrap();
        translator.translate("  hello\n", "en", "pt").await.unwrap();

        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_result_is_capitalized() {
        let provider = MockProvider::replying("bonjour");
        let translator = translator_with(provider);

        let result = translator.translate("hello", "en", "fr").await.unwrap();
        assert_eq!(result.text, "Bonjour");
    }

    #[tokio::test]
    async fn test_failure_uses_offline_dictionary() {
        let provider = MockProvider::failing(http_failure());
        let translator = translator_with(provider);

        let result = translator.translate("hello", "en", "pt").await.unwrap();
        assert_eq!(result, Translation::new("olá", TranslationOrigin::Fallback));
    }

    #[tokio::test]
    async fn test_failure_without_dictionary_entry_returns_placeholder() {
        let provider = MockProvider::failing(http_failure());
        let translator = translator_with(provider);

        let result = translator.translate("xylophone", "en", "pt").await.unwrap();
        assert!(result.text.contains("xylophone"));
        assert_eq!(result.text, unavailable_message("xylophone"));
        assert!(!result.is_available());
        assert!(translator.cache().is_empty());
    }

    #[tokio::test]
    async fn test_placeholder_is_not_cached() {
        let provider = MockProvider::failing(http_failure());
        let translator = translator_with(provider.clone());

        translator.translate("xylophone", "en", "pt").await.unwrap();
        provider.set_reply(Ok("xilofone".to_string()));
        let result = translator.translate("xylophone", "en", "pt").await.unwrap();

        assert_eq!(result, Translation::new("Xilofone", TranslationOrigin::Remote));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_semantic_failure_also_falls_back() {
        let provider = MockProvider::failing(TranslateError::Rejected {
            status: 429,
            details: "QUOTA EXCEEDED".to_string(),
        });
        let translator = translator_with(provider);

        let result = translator.translate("water", "en", "pt").await.unwrap();
        assert_eq!(result.text, "água");
    }

    #[tokio::test]
    async fn test_fallback_only_for_its_language_pair() {
        let provider = MockProvider::failing(http_failure());
        let translator = translator_with(provider);

        let result = translator.translate("hello", "en", "es").await.unwrap();
        assert_eq!(result.text, unavailable_message("hello"));
    }

    #[tokio::test]
    async fn test_fallback_value_stays_cached_after_recovery() {
        let provider = MockProvider::failing(http_failure());
        let translator = translator_with(provider.clone());

        assert_eq!(translator.translate("hello", "en", "pt").await.unwrap().text, "olá");

        provider.set_reply(Ok("oi".to_string()));
        assert_eq!(
            translator.translate("hello", "en", "pt").await.unwrap(),
            Translation::new("olá", TranslationOrigin::Cached)
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_direct_propagates_failure() {
        let provider = MockProvider::failing(http_failure());
        let translator = translator_with(provider);

        let result = translator.translate_direct("hello", "en", "pt").await;
        assert_eq!(result, Err(http_failure()));
    }

    #[tokio::test]
    async fn test_direct_bypasses_cache() {
        let provider = MockProvider::replying("bonjour");
        let translator = translator_with(provider.clone());

        assert_eq!(
            translator.translate_direct("hello", "en", "fr").await.unwrap(),
            "Bonjour"
        );
        translator.translate_direct("hello", "en", "fr").await.unwrap();

        assert_eq!(provider.calls(), 2);
        assert!(translator.cache().is_empty());
    }

    #[tokio::test]
    async fn test_casing_produces_distinct_cache_keys() {
        let provider = MockProvider::replying("olá");
        let translator = translator_with(provider.clone());

        translator.translate("Hello", "en", "pt").await.unwrap();
        translator.translate("hello", "en", "pt").await.unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(translator.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_casing_converges_on_fallback() {
        let provider = MockProvider::failing(http_failure());
        let translator = translator_with(provider);

        assert_eq!(translator.translate("Hello", "en", "pt").await.unwrap().text, "olá");
        assert_eq!(translator.translate("hello", "en", "pt").await.unwrap().text, "olá");
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_provider() {
        let provider = MockProvider::replying("x");
        let translator = translator_with(provider.clone());

        assert_eq!(
            translator.translate("   ", "en", "pt").await,
            Err(TranslateError::EmptyText)
        );
        assert_eq!(
            translator.translate_direct("", "en", "pt").await,
            Err(TranslateError::EmptyText)
        );
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_from_config_round_trips_persisted_cache() {
        let cache_file = std::env::temp_dir()
            .join(format!("martins_translator_cache_{}.json", std::process::id()));
        let config = Config {
            persist_cache: true,
            cache_file: cache_file.to_string_lossy().to_string(),
            ..Config::default()
        };

        let translator = Translator::from_config(&config).unwrap();
        assert_eq!(translator.provider_name(), "MyMemory");
        translator
            .cache()
            .insert(CacheKey::new("hello", "en", "pt"), "Olá".to_string());
        translator.persist_cache(&config);

        let restored = Translator::from_config(&config).unwrap();
        assert_eq!(
            restored.cache().get(&CacheKey::new("hello", "en", "pt")),
            Some("Olá".to_string())
        );

        let _ = std::fs::remove_file(&cache_file);
    }

    #[test]
    fn test_rebuilt_provider_keeps_cache() {
        let translator = translator_with(MockProvider::replying("olá"));
        translator
            .cache()
            .insert(CacheKey::new("hello", "en", "pt"), "Olá".to_string());

        let rebuilt = translator.with_provider_from(&Config::default()).unwrap();
        assert_eq!(rebuilt.provider_name(), "MyMemory");
        assert_eq!(rebuilt.cache().len(), 1);

        let config = Config {
            translate_provider: "babelfish".to_string(),
            ..Config::default()
        };
        assert!(translator.with_provider_from(&config).is_err());
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let config = Config {
            translate_provider: "babelfish".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            Translator::from_config(&config),
            Err(TranslateError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_normalize_translation() {
        assert_eq!(normalize_translation("  bonjour  "), "Bonjour");
        assert_eq!(normalize_translation("água fria"), "Água fria");
        assert_eq!(normalize_translation("Already"), "Already");
        assert_eq!(normalize_translation("   "), "");
    }

    #[test]
    fn test_is_single_word() {
        assert!(is_single_word("hello"));
        assert!(is_single_word("\"well-known\","));
        assert!(!is_single_word("hello world"));
        assert!(!is_single_word("42"));
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("Hello,"), Some("hello".to_string()));
        assert_eq!(clean_word("(don't)"), Some("dont".to_string()));
        assert_eq!(clean_word("a."), None);
        assert_eq!(clean_word("--"), None);
    }
}
