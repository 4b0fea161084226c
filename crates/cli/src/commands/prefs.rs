use anyhow::bail;
use clap::Subcommand;
use tawseek_misr::{Language, Theme};

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the stored preferences
    Show,
    /// Change stored preferences
    Set {
        #[arg(long)]
        language: Option<Language>,
        #[arg(long)]
        theme: Option<Theme>,
        /// Auth token; pass an empty string to forget it
        #[arg(long)]
        token: Option<String>,
    },
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    match args.action {
        Action::Show => {
            let prefs = &ctx.preferences;
            println!("Language: {}", prefs.language);
            println!("Theme: {:?}", prefs.theme);
            println!(
                "Auth token: {}",
                if prefs.auth_token.is_some() { "set" } else { "not set" }
            );
            Ok(ExitCode::Ok)
        }
        Action::Set {
            language,
            theme,
            token,
        } => {
            let Some(path) = &ctx.preferences_path else {
                bail!("No preferences location; pass --preferences");
            };
            let mut prefs = ctx.preferences.clone();
            if let Some(language) = language {
                prefs.language = language;
            }
            if let Some(theme) = theme {
                prefs.theme = theme;
            }
            if let Some(token) = token {
                prefs.auth_token = Some(token).filter(|t| !t.trim().is_empty());
            }
            prefs.save(path).await?;
            eprintln!("Preferences saved to {}", path.display());
            Ok(ExitCode::Ok)
        }
    }
}
