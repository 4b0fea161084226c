use lazy_static::lazy_static;
use reqwest::Url;

use crate::i18n::Language;

lazy_static! {
    pub static ref DEFAULT_BASE_URL: Url =
        Url::parse("https://tawseek.moj.gov.eg/TawseekMisr/").unwrap();
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Must end with `/` so endpoint paths join below it.
    pub base_url: Url,
    pub auth_token: Option<String>,
    pub language: Language,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::new(DEFAULT_BASE_URL.clone())
    }
}

impl ClientConfig {
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        ClientConfig {
            base_url,
            auth_token: None,
            language: Language::default(),
        }
    }

    pub fn auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}
