use tawseek_misr::{LandingBootstrap, LandingOutcome, Platform};

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// Version code of the installed app
    #[arg(short, long, default_value_t = 1)]
    pub version_code: u32,

    /// Platform whose minimum version applies (android, ios)
    #[arg(short, long, default_value = "android")]
    pub platform: Platform,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let api = ctx.api()?;
    let outcome = LandingBootstrap::new(&api)
        .run(args.version_code, args.platform)
        .await?;

    match outcome {
        LandingOutcome::UpdateRequired {
            installed,
            required,
        } => {
            eprintln!("Update required: installed version {installed}, minimum {required}");
            Ok(ExitCode::RequestUnsatisfied)
        }
        LandingOutcome::Ready {
            offices,
            governments,
        } => {
            println!("Offices loaded: {}", offices.len());
            println!("Governments loaded: {}", governments.len());
            Ok(ExitCode::Ok)
        }
    }
}
