use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::api::{STATUS_NATIONAL_ID_VALID, STATUS_OK, TawseekApi};
use crate::error::{Error, Result};
use crate::i18n::{Language, Message};
use crate::model::InquireReservation;
use crate::repository::Repository;
use crate::validation::{NATIONAL_ID_LENGTH, keys};

/// Format of `reservationDate` (and of `reservationTime` for exact-slot
/// offices) in inquiry results, e.g. `2023-09-20 12:00:00.0`.
pub const RESERVATION_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

const AM_MARKER: &str = "ص";
const PM_MARKER: &str = "م";

lazy_static! {
    static ref RE_DIGITS_ONLY: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

pub fn is_well_formed_national_id(national_id: &str) -> bool {
    national_id.chars().count() == NATIONAL_ID_LENGTH && RE_DIGITS_ONLY.is_match(national_id)
}

/// Local check of a national ID: present, 14 characters, digits only.
pub fn validate_national_id_format(national_id: &str, language: Language) -> Result<()> {
    let message = if national_id.trim().is_empty() {
        Message::NationalIdRequired
    } else if national_id.chars().count() != NATIONAL_ID_LENGTH {
        Message::NationalIdLength
    } else if !RE_DIGITS_ONLY.is_match(national_id) {
        Message::NationalIdDigitsOnly
    } else {
        return Ok(());
    };
    Err(Error::Validation(BTreeMap::from([(
        keys::NATIONAL_ID,
        message.text(language).to_string(),
    )])))
}

pub fn parse_reservation_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), RESERVATION_DATETIME_FORMAT).ok()
}

/// `2023-09-20 12:00:00.0` to `20/09/2023`; anything else is returned as-is.
pub fn format_reservation_date(raw: &str) -> String {
    match parse_reservation_datetime(raw) {
        Some(dt) => dt.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Exact-slot offices (`"1"`, `"4"`) get a 12-hour clock with an Arabic
/// AM/PM marker. Period offices already send a label, which is kept, as
/// is anything that fails to parse.
pub fn format_reservation_time(raw: &str, vip_flag: &str) -> String {
    match vip_flag.trim() {
        "1" | "4" => match parse_reservation_datetime(raw) {
            Some(dt) => {
                let marker = if dt.hour() < 12 { AM_MARKER } else { PM_MARKER };
                format!("{} {}", dt.format("%I:%M"), marker)
            }
            None => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}

fn sort_key(reservation: &InquireReservation) -> NaiveDateTime {
    parse_reservation_datetime(&reservation.reservation_date)
        .unwrap_or(DateTime::UNIX_EPOCH.naive_utc())
}

/// Newest first. Unparseable dates count as the epoch and end up last.
pub fn sort_reservations_by_date(reservations: &[InquireReservation]) -> Vec<InquireReservation> {
    let mut sorted = reservations.to_vec();
    sorted.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    sorted
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationFilter {
    #[default]
    All,
    Upcoming,
    Past,
}

impl FromStr for ReservationFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ReservationFilter::All),
            "upcoming" => Ok(ReservationFilter::Upcoming),
            "past" => Ok(ReservationFilter::Past),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// Current wall-clock time in Egypt, which is what reservation dates use.
pub fn cairo_now() -> NaiveDateTime {
    Utc::now()
        .with_timezone(&chrono_tz::Africa::Cairo)
        .naive_local()
}

/// Reservations with unparseable dates always pass the filter.
pub fn filter_reservations_at(
    reservations: &[InquireReservation],
    filter: ReservationFilter,
    now: NaiveDateTime,
) -> Vec<InquireReservation> {
    if filter == ReservationFilter::All {
        return reservations.to_vec();
    }
    reservations
        .iter()
        .filter(|reservation| {
            match parse_reservation_datetime(&reservation.reservation_date) {
                Some(date) => match filter {
                    ReservationFilter::Upcoming => date > now,
                    ReservationFilter::Past => date < now,
                    ReservationFilter::All => true,
                },
                None => true,
            }
        })
        .cloned()
        .collect()
}

pub fn filter_reservations(
    reservations: &[InquireReservation],
    filter: ReservationFilter,
) -> Vec<InquireReservation> {
    filter_reservations_at(reservations, filter, cairo_now())
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReservationStats {
    pub total: usize,
    pub upcoming: usize,
    pub past: usize,
}

/// Unlike [`filter_reservations_at`], unparseable dates are left out of
/// both the upcoming and the past counts.
pub fn reservation_stats_at(
    reservations: &[InquireReservation],
    now: NaiveDateTime,
) -> ReservationStats {
    let mut stats = ReservationStats {
        total: reservations.len(),
        ..Default::default()
    };
    for reservation in reservations {
        let Some(date) = parse_reservation_datetime(&reservation.reservation_date) else {
            continue;
        };
        if date > now {
            stats.upcoming += 1;
        } else if date < now {
            stats.past += 1;
        }
    }
    stats
}

pub fn reservation_stats(reservations: &[InquireReservation]) -> ReservationStats {
    reservation_stats_at(reservations, cairo_now())
}

/// Server-backed part of the booking inquiry.
pub struct BookingInquiry<'a, R> {
    api: &'a TawseekApi<R>,
    language: Language,
}

impl<'a, R: Repository> BookingInquiry<'a, R> {
    pub fn new(api: &'a TawseekApi<R>, language: Language) -> Self {
        BookingInquiry { api, language }
    }

    /// `Ok(true)` when the server answers status `"1"`; any other status is
    /// a domain error carrying the server's description.
    pub async fn validate_national_id_with_api(&self, national_id: &str) -> Result<bool> {
        let envelope = self.api.validate_national_id(national_id).await?;
        if envelope.has_status(STATUS_NATIONAL_ID_VALID) {
            return Ok(true);
        }
        debug!(
            "National ID rejected with status {:?}: {}",
            envelope.status_code, envelope.description
        );
        let message = if envelope.description.trim().is_empty() {
            Message::NationalIdNotVerified.text(self.language).to_string()
        } else {
            envelope.description
        };
        Err(Error::domain(envelope.status_code, message))
    }

    pub async fn fetch_reservations(&self, national_id: &str) -> Result<Vec<InquireReservation>> {
        let reservations = self
            .api
            .inquire_reservations(national_id)
            .await?
            .into_data(STATUS_OK)?
            .unwrap_or_default();
        debug!("Inquiry returned {} reservations", reservations.len());
        Ok(reservations)
    }
}
