use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The unique numeric ID of an office (org unit).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OfficeId(pub u32);

/// The unique numeric ID of a government (governorate).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GovernmentId(pub u32);

/// Server-provided booking mode of an office, "1" to "4".
///
/// Kept as the raw string the backend sends so unknown values survive a
/// round trip; see [`crate::select_strategy`] for how it is interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct VipFlag(pub String);

impl VipFlag {
    pub fn new(flag: impl Into<String>) -> Self {
        VipFlag(flag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Offices booked by exact time slot.
    pub fn is_exact_slot(&self) -> bool {
        matches!(self.0.trim(), "1" | "4")
    }

    /// Offices booked by named time period.
    pub fn is_period(&self) -> bool {
        matches!(self.0.trim(), "2" | "3")
    }
}

impl fmt::Display for VipFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Android,
    Ios,
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl FromStr for Coordinates {
    type Err = String;

    /// Parses `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat, lon)) = s.split_once(',') else {
            return Err(format!("expected \"lat,lon\", got {s:?}"));
        };
        let latitude = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
        let longitude = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Office {
    pub id: OfficeId,
    pub name: String,
    pub address: String,
    pub government_id: Option<GovernmentId>,
    pub location: Option<Coordinates>,
    pub vip_flag: VipFlag,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Government {
    pub id: GovernmentId,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservationClassification {
    #[serde(rename = "code")]
    pub code: String,
    #[serde(rename = "description")]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservationType {
    #[serde(rename = "code")]
    pub code: String,
    #[serde(rename = "description")]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservePeriod {
    #[serde(rename = "timePeriodCode")]
    pub time_period_code: String,
    #[serde(rename = "timePeriodName")]
    pub label: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AgendaDay {
    /// `yyyy-MM-dd`, sometimes followed by a time component.
    #[serde(rename = "datereserved")]
    pub date_reserved: String,
    #[serde(rename = "reservationTime", default)]
    pub reservation_times: Vec<String>,
    #[serde(rename = "reservePeriods", default)]
    pub reserve_periods: Vec<ReservePeriod>,
}

impl AgendaDay {
    /// The `yyyy-MM-dd` part of `date_reserved`.
    pub fn iso_date(&self) -> &str {
        self.date_reserved
            .get(..10)
            .unwrap_or(self.date_reserved.as_str())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.iso_date(), "%Y-%m-%d").ok()
    }
}

/// Availability calendar of one office for one transaction type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct OfficeAgenda {
    #[serde(rename = "vipFlag")]
    pub vip_flag: VipFlag,
    #[serde(rename = "agenda", default)]
    pub days: Vec<AgendaDay>,
}

impl OfficeAgenda {
    /// Finds the day whose reserved date matches `iso_date` (`yyyy-MM-dd`).
    pub fn day(&self, iso_date: &str) -> Option<&AgendaDay> {
        self.days.iter().find(|day| day.iso_date() == iso_date)
    }

    /// Bookable dates in the `dd/MM/yyyy` form the booking form uses.
    pub fn available_dates(&self) -> Vec<String> {
        self.days
            .iter()
            .filter(|day| !day.reservation_times.is_empty() || !day.reserve_periods.is_empty())
            .map(|day| match day.date() {
                Some(date) => date.format("%d/%m/%Y").to_string(),
                None => day.date_reserved.clone(),
            })
            .collect()
    }
}

/// A booked appointment as returned by the inquiry endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InquireReservation {
    #[serde(rename = "orgUnitId")]
    pub office_id: OfficeId,
    #[serde(rename = "orgUnitName", default)]
    pub office_name: String,
    #[serde(rename = "orgVipFlag", default)]
    pub org_vip_flag: VipFlag,
    #[serde(rename = "transCategoryDesc", default)]
    pub category_description: String,
    #[serde(rename = "transTypeDesc", default)]
    pub type_description: String,
    #[serde(rename = "queId", default)]
    pub que_id: String,
    /// `yyyy-MM-dd HH:mm:ss.S`
    #[serde(rename = "reservationDate", default)]
    pub reservation_date: String,
    /// Same format as `reservation_date` for exact-slot offices, a period
    /// label otherwise.
    #[serde(rename = "reservationTime", default)]
    pub reservation_time: String,
}

/// Outbound payload of the create-reservation endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    #[serde(rename = "nationalId")]
    pub national_id: String,
    #[serde(rename = "orgUnitId")]
    pub office_id: OfficeId,
    #[serde(rename = "categoryCode")]
    pub category_code: String,
    #[serde(rename = "typeCode")]
    pub type_code: String,
    /// `dd-MM-yyyy HH:mm`
    #[serde(rename = "reservationSlot")]
    pub reservation_slot: String,
    #[serde(rename = "period")]
    pub period: String,
    #[serde(rename = "requestQueVIPId")]
    pub request_que_vip_id: Option<i64>,
    #[serde(rename = "vipFlag")]
    pub vip_flag: VipFlag,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservationConfirmation {
    pub que_id: Option<String>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    #[serde(rename = "androidVersionCode")]
    pub android_min_version_code: u32,
    #[serde(rename = "iosVersionCode")]
    pub ios_min_version_code: u32,
    #[serde(rename = "versionName", default)]
    pub latest_version_name: Option<String>,
}

impl VersionInfo {
    pub fn required_for(&self, platform: Platform) -> u32 {
        match platform {
            Platform::Android => self.android_min_version_code,
            Platform::Ios => self.ios_min_version_code,
        }
    }
}
