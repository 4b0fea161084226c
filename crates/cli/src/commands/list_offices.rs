use tawseek_misr::{Coordinates, GovernmentId, OfficeQuery};

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// Filter offices by government ID
    #[arg(short, long)]
    pub government: Option<u32>,

    /// Filter offices whose name or address contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort by distance from this point, given as "lat,lon"
    #[arg(short, long, allow_hyphen_values = true)]
    pub near: Option<Coordinates>,

    /// Prints the results in JSON format
    #[arg(long)]
    pub json: bool,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let api = ctx.api()?;
    let offices = api.offices().await?;

    let query = OfficeQuery {
        search: args.search,
        government_id: args.government.map(GovernmentId),
        origin: args.near,
    };
    let matches = query.apply(&offices);

    if args.json {
        println!("{}", serde_json::to_string(&matches)?);
    } else {
        println!("{:<6} | {:<4} | {:>9} | {}", "ID", "VIP", "Distance", "Name");
        for m in &matches {
            let distance = m
                .distance_km
                .map(|d| format!("{d:.1} km"))
                .unwrap_or_default();
            println!(
                "{:<6} | {:<4} | {:>9} | {}",
                m.office.id.0, m.office.vip_flag, distance, m.office.name
            );
        }
    }

    if matches.is_empty() {
        eprintln!("No offices match the specified criteria.");
        return Ok(ExitCode::RequestUnsatisfied);
    }
    Ok(ExitCode::Ok)
}
