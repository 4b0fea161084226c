use std::path::PathBuf;
use std::process::Termination;

use anyhow::Context as _;
use reqwest::{ClientBuilder, Url};
use tawseek_misr::{
    ClientConfig, DEFAULT_BASE_URL, HttpSession, Language, Preferences, TawseekApi,
};

pub mod book;
pub mod classifications;
pub mod inquire;
pub mod landing;
pub mod list_governments;
pub mod list_offices;
pub mod office_agenda;
pub mod prefs;
pub mod types;

#[repr(u8)]
pub enum ExitCode {
    Ok = 0,
    FaultOrArgsError = 1,
    RequestUnsatisfied = 2,
}

impl Termination for ExitCode {
    fn report(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }
}

/// Settings shared by every command: flags and environment first, then the
/// preferences file.
pub struct Context {
    pub config: ClientConfig,
    pub preferences: Preferences,
    pub preferences_path: Option<PathBuf>,
}

impl Context {
    pub async fn load(
        base_url: Option<Url>,
        token: Option<String>,
        lang: Option<Language>,
        preferences_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let preferences_path = preferences_path.or_else(Preferences::default_path);
        let preferences = match &preferences_path {
            Some(path) => Preferences::load(path).await?,
            None => Preferences::default(),
        };

        let config = ClientConfig::new(base_url.unwrap_or_else(|| DEFAULT_BASE_URL.clone()))
            .auth_token(token.or_else(|| preferences.auth_token.clone()))
            .language(lang.unwrap_or(preferences.language));

        Ok(Context {
            config,
            preferences,
            preferences_path,
        })
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn api(&self) -> anyhow::Result<TawseekApi<HttpSession>> {
        let session = HttpSession::new(ClientBuilder::new(), self.config.clone())
            .context("Creating HTTP session")?;
        Ok(TawseekApi::new(session))
    }
}
