use crate::error::TranslateError;
use async_trait::async_trait;
use std::time::Duration;

pub mod mymemory;

/// Connection settings shared by HTTP-backed providers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOptions {
    /// Endpoint override; `None` means the provider's public endpoint
    pub api_url: Option<String>,
    /// Contact email some services use to raise the anonymous quota
    pub email: Option<String>,
    /// `None` leaves the transport's own default in place
    pub timeout: Option<Duration>,
}

// Main translation provider trait
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate text from one language to another.
    /// Returns the raw translated text exactly as the remote service sent it.
    async fn translate_text(&self, text: &str, from: &str, to: &str)
        -> Result<String, TranslateError>;

    /// Get provider name for display purposes
    fn name(&self) -> &str;
}

/// Create translation provider based on name
pub fn create_provider(
    provider_name: &str,
    options: &ProviderOptions,
) -> Result<Box<dyn TranslationProvider>, TranslateError> {
    match provider_name.trim().to_lowercase().as_str() {
        "mymemory" => Ok(Box::new(mymemory::MyMemoryProvider::new(options)?)),
        _ => Err(TranslateError::UnknownProvider(provider_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_provider() {
        let provider = create_provider("MyMemory", &ProviderOptions::default()).unwrap();
        assert_eq!(provider.name(), "MyMemory");
    }

    #[test]
    fn test_create_unknown_provider() {
        let err = create_provider("deepl", &ProviderOptions::default())
            .err()
            .unwrap();
        assert_eq!(err, TranslateError::UnknownProvider("deepl".to_string()));
    }

    #[test]
    fn test_create_with_invalid_url() {
        let options = ProviderOptions {
            api_url: Some("not a url".to_string()),
            ..ProviderOptions::default()
        };
        let err = create_provider("mymemory", &options).err().unwrap();
        assert!(matches!(err, TranslateError::InvalidUrl(_)));
    }
}
