use serde::Serialize;
use tawseek_misr::{
    BookingInquiry, Error, ReservationFilter, ReservationStats, filter_reservations,
    format_reservation_date, format_reservation_time, reservation_stats,
    sort_reservations_by_date, validate_national_id_format,
};

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// National ID to look up (14 digits)
    #[arg(short, long)]
    national_id: String,

    /// Which reservations to show (all, upcoming, past)
    #[arg(short, long, default_value = "all")]
    filter: ReservationFilter,

    /// Prints all the results at once in JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
pub struct ReservationLine {
    que_id: String,
    office: String,
    category: String,
    kind: String,
    date: String,
    time: String,
}

#[derive(Serialize)]
pub struct InquiryResult {
    stats: ReservationStats,
    reservations: Vec<ReservationLine>,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let language = ctx.language();
    if let Err(err) = validate_national_id_format(&args.national_id, language) {
        eprintln!("{}", err.user_message(language));
        return Ok(ExitCode::FaultOrArgsError);
    }

    let api = ctx.api()?;
    let inquiry = BookingInquiry::new(&api, language);
    let reservations = match inquiry.fetch_reservations(&args.national_id).await {
        Ok(reservations) => reservations,
        Err(err @ Error::Domain { .. }) => {
            eprintln!("{}", err.user_message(language));
            return Ok(ExitCode::RequestUnsatisfied);
        }
        Err(err) => return Err(err.into()),
    };

    let stats = reservation_stats(&reservations);
    let shown = filter_reservations(&sort_reservations_by_date(&reservations), args.filter);
    let lines: Vec<ReservationLine> = shown
        .iter()
        .map(|r| ReservationLine {
            que_id: r.que_id.clone(),
            office: r.office_name.clone(),
            category: r.category_description.clone(),
            kind: r.type_description.clone(),
            date: format_reservation_date(&r.reservation_date),
            time: format_reservation_time(&r.reservation_time, r.org_vip_flag.as_str()),
        })
        .collect();

    if args.json {
        println!(
            "{}",
            serde_json::to_string(&InquiryResult {
                stats,
                reservations: lines,
            })?
        );
        return Ok(ExitCode::Ok);
    }

    println!(
        "Total: {} | Upcoming: {} | Past: {}",
        stats.total, stats.upcoming, stats.past
    );
    for line in &lines {
        println!(
            "{:<8} | {:<10} | {:<16} | {} | {} / {}",
            line.que_id, line.date, line.time, line.office, line.category, line.kind
        );
    }

    if lines.is_empty() {
        return Ok(ExitCode::RequestUnsatisfied);
    }
    Ok(ExitCode::Ok)
}
