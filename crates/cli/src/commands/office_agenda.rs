use serde::Serialize;
use tawseek_misr::{OfficeId, ReservationStrategy};

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// Office to fetch the agenda for
    #[arg(short, long)]
    office_id: u32,

    /// Classification code
    #[arg(short, long)]
    classification: String,

    /// Type code
    #[arg(short = 't', long = "type")]
    type_code: String,

    /// Prints all the results at once in JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
pub struct DayWithSlots {
    day: String,
    slots: Vec<String>,
}

#[derive(Serialize)]
pub struct OfficeAgendaInfo {
    office_id: u32,
    vip_flag: String,
    by_period: bool,
    days: Vec<DayWithSlots>,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let api = ctx.api()?;
    let agenda = api
        .agenda(
            OfficeId(args.office_id),
            &args.classification,
            &args.type_code,
        )
        .await?;
    let strategy = agenda.vip_flag.strategy();

    let days: Vec<DayWithSlots> = agenda
        .available_dates()
        .into_iter()
        .map(|day| DayWithSlots {
            slots: strategy.slots(&agenda, &day),
            day,
        })
        .collect();

    if args.json {
        println!(
            "{}",
            serde_json::to_string(&OfficeAgendaInfo {
                office_id: args.office_id,
                vip_flag: agenda.vip_flag.to_string(),
                by_period: strategy == ReservationStrategy::Period,
                days,
            })?
        );
        return Ok(ExitCode::Ok);
    }

    if let Some(office) = api.office(OfficeId(args.office_id)).await? {
        println!("{} ({})", office.name, office.address);
    }
    if days.is_empty() {
        eprintln!("No available dates for this office.");
        return Ok(ExitCode::RequestUnsatisfied);
    }
    for day in days {
        println!("{}: {}", day.day, day.slots.join(", "));
    }
    Ok(ExitCode::Ok)
}
