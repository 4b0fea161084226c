use tawseek_misr::OfficeId;

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// Office to list classifications for
    #[arg(short, long)]
    pub office_id: u32,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let api = ctx.api()?;
    let classifications = api.classifications(OfficeId(args.office_id)).await?;
    if classifications.is_empty() {
        eprintln!("Office {} offers no classifications.", args.office_id);
        return Ok(ExitCode::RequestUnsatisfied);
    }

    println!("{:<6} | {}", "Code", "Description");
    for classification in classifications {
        println!("{:<6} | {}", classification.code, classification.description);
    }
    Ok(ExitCode::Ok)
}
