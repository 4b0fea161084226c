use tawseek_misr::{Error, NationalIdValidationState, OfficeId, ReservationBooking};

use super::{Context, ExitCode};

#[derive(clap::Args)]
pub struct Args {
    /// Office to book at
    #[arg(short, long)]
    office_id: u32,

    /// National ID of the applicant (14 digits)
    #[arg(short, long)]
    national_id: String,

    /// Classification code
    #[arg(short, long)]
    classification: String,

    /// Type code
    #[arg(short = 't', long = "type")]
    type_code: String,

    /// Appointment date, dd/MM/yyyy
    #[arg(short, long)]
    date: String,

    /// Appointment time (HH:mm) or period label, as listed by office-agenda
    #[arg(long)]
    time: String,

    /// Confirm that the entered data is correct
    #[arg(long)]
    confirm: bool,
}

pub async fn main(ctx: &Context, args: Args) -> anyhow::Result<ExitCode> {
    let api = ctx.api()?;
    let language = ctx.language();
    let mut booking = ReservationBooking::new(&api, OfficeId(args.office_id), language);

    booking.load_classifications().await?;
    // Selection errors are reported with the rest of the form on submit.
    if let Err(err) = booking.select_classification(&args.classification).await {
        if !matches!(err, Error::Validation(_)) {
            return Err(err.into());
        }
    }
    report_rejection(booking.select_type(&args.type_code))?;
    if booking.form().selected_type.is_some() {
        booking.load_agenda().await?;
    }
    booking.set_appointment_date(&args.date);
    report_rejection(booking.select_time(&args.time))?;
    booking.set_confirmation(args.confirm);

    if let NationalIdValidationState::Error(reason) =
        booking.update_national_id(&args.national_id).await
    {
        eprintln!("{reason}");
        return Ok(ExitCode::FaultOrArgsError);
    }

    match booking.submit().await {
        Ok(confirmation) => {
            if !confirmation.message.is_empty() {
                println!("{}", confirmation.message);
            }
            if let Some(que_id) = confirmation.que_id {
                println!("Queue number: {que_id}");
            }
            Ok(ExitCode::Ok)
        }
        Err(Error::Validation(_)) => {
            for field in booking.fields() {
                if let Some(error) = field.error() {
                    eprintln!("{}: {}", field.meta().label.resolve(language), error);
                }
            }
            Ok(ExitCode::RequestUnsatisfied)
        }
        Err(err @ Error::Domain { .. }) => {
            eprintln!("{}", err.user_message(language));
            Ok(ExitCode::RequestUnsatisfied)
        }
        Err(err) => Err(err.into()),
    }
}

/// Prints a rejected selection and carries on; anything else aborts.
fn report_rejection(result: tawseek_misr::Result<()>) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(Error::Validation(errors)) => {
            for message in errors.values() {
                eprintln!("{message}");
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
