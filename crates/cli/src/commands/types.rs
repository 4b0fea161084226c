use tawseek_misr::OfficeId;

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// Office offering the classification
    #[arg(short, long)]
    pub office_id: u32,

    /// Classification code
    #[arg(short, long)]
    pub classification: String,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let api = ctx.api()?;
    let types = api
        .types(OfficeId(args.office_id), &args.classification)
        .await?;
    if types.is_empty() {
        eprintln!("Classification {} has no types.", args.classification);
        return Ok(ExitCode::RequestUnsatisfied);
    }

    println!("{:<6} | {}", "Code", "Description");
    for reservation_type in types {
        println!("{:<6} | {}", reservation_type.code, reservation_type.description);
    }
    Ok(ExitCode::Ok)
}
