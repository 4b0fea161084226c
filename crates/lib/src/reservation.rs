use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::api::TawseekApi;
use crate::error::{Error, Result};
use crate::form::{DropDownOption, FieldMeta, FormField, Label};
use crate::i18n::{Language, Message};
use crate::inquiry::{BookingInquiry, is_well_formed_national_id};
use crate::model::{
    OfficeAgenda, OfficeId, ReservationClassification, ReservationConfirmation,
    ReservationRequest, ReservationType, VipFlag,
};
use crate::repository::Repository;
use crate::validation::{
    NationalIdValidationState, ReservationDraft, ReservationFormState, ReservationFormValidator,
    ValidationResult, Validator, keys,
};

/// Date format of the booking form.
pub const UI_DATE_FORMAT: &str = "%d/%m/%Y";
/// Date format the create-reservation endpoint expects.
pub const API_DATE_FORMAT: &str = "%d-%m-%Y";
/// Date format of agenda entries.
pub const AGENDA_DATE_FORMAT: &str = "%Y-%m-%d";
/// Time of day sent for period-based offices.
pub const PERIOD_SLOT_TIME: &str = "00:00";

/// How a reservation request is built for an office.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStrategy {
    /// The user picks an exact time; the slot carries it.
    ExactSlot,
    /// The user picks a named period; the slot time is zeroed and the
    /// period travels as its code.
    Period,
}

/// Maps the office VIP flag to a booking strategy.
///
/// `"1"` and `"4"` book exact slots, `"2"` and `"3"` book periods. Any
/// other value books periods as well.
pub fn select_strategy(vip_flag: &str) -> ReservationStrategy {
    match vip_flag.trim() {
        "1" | "4" => ReservationStrategy::ExactSlot,
        "2" | "3" => ReservationStrategy::Period,
        other => {
            warn!("Unknown VIP flag {other:?}, booking by period");
            ReservationStrategy::Period
        }
    }
}

impl VipFlag {
    pub fn strategy(&self) -> ReservationStrategy {
        select_strategy(self.as_str())
    }
}

/// `dd/MM/yyyy` to `dd-MM-yyyy`. Unparseable input has its slashes
/// replaced instead.
pub fn to_api_date(ui_date: &str) -> String {
    match NaiveDate::parse_from_str(ui_date.trim(), UI_DATE_FORMAT) {
        Ok(date) => date.format(API_DATE_FORMAT).to_string(),
        Err(err) => {
            debug!("to_api_date: {ui_date:?} is not dd/MM/yyyy ({err}), substituting separators");
            ui_date.trim().replace('/', "-")
        }
    }
}

/// `dd/MM/yyyy` to the `yyyy-MM-dd` form used by agenda entries.
pub fn to_agenda_date(ui_date: &str) -> Option<String> {
    NaiveDate::parse_from_str(ui_date.trim(), UI_DATE_FORMAT)
        .ok()
        .map(|date| date.format(AGENDA_DATE_FORMAT).to_string())
}

/// Finds the code of the period labelled `label` on `ui_date`.
pub fn lookup_period_code(agenda: &OfficeAgenda, ui_date: &str, label: &str) -> Option<String> {
    let iso_date = to_agenda_date(ui_date)?;
    agenda
        .day(&iso_date)?
        .reserve_periods
        .iter()
        .find(|period| period.label == label)
        .map(|period| period.time_period_code.clone())
}

/// Everything needed to build the outbound request, already validated.
#[derive(Debug, Clone)]
pub struct ReservationInput<'a> {
    pub national_id: &'a str,
    pub office_id: OfficeId,
    pub category_code: &'a str,
    pub type_code: &'a str,
    /// `dd/MM/yyyy`
    pub date: &'a str,
    /// `HH:mm` or a period label, depending on the strategy.
    pub time: &'a str,
    pub agenda: &'a OfficeAgenda,
}

impl ReservationStrategy {
    pub fn build_request(&self, input: &ReservationInput<'_>) -> ReservationRequest {
        let api_date = to_api_date(input.date);
        let (reservation_slot, period) = match self {
            ReservationStrategy::ExactSlot => {
                (format!("{} {}", api_date, input.time.trim()), String::new())
            }
            ReservationStrategy::Period => {
                let code = lookup_period_code(input.agenda, input.date, input.time)
                    .unwrap_or_else(|| {
                        warn!(
                            "No period code for {:?} on {:?}, sending an empty period",
                            input.time, input.date
                        );
                        String::new()
                    });
                (format!("{api_date} {PERIOD_SLOT_TIME}"), code)
            }
        };

        ReservationRequest {
            national_id: input.national_id.trim().to_string(),
            office_id: input.office_id,
            category_code: input.category_code.to_string(),
            type_code: input.type_code.to_string(),
            reservation_slot,
            period,
            request_que_vip_id: None,
            vip_flag: input.agenda.vip_flag.clone(),
        }
    }

    /// Choices the user can pick for `ui_date`: raw times or period labels.
    pub fn slots(&self, agenda: &OfficeAgenda, ui_date: &str) -> Vec<String> {
        let Some(day) = to_agenda_date(ui_date).and_then(|iso| agenda.day(&iso)) else {
            return Vec::new();
        };
        match self {
            ReservationStrategy::ExactSlot => day.reservation_times.clone(),
            ReservationStrategy::Period => day
                .reserve_periods
                .iter()
                .map(|period| period.label.clone())
                .collect(),
        }
    }
}

fn single_error(key: &'static str, message: Message, language: Language) -> Error {
    Error::Validation(BTreeMap::from([(key, message.text(language).to_string())]))
}

/// One booking session at one office: the multi-step form, its dependent
/// lookups and the final submission.
pub struct ReservationBooking<'a, R> {
    api: &'a TawseekApi<R>,
    office_id: OfficeId,
    language: Language,
    form: ReservationFormState,
    national_id_status: NationalIdValidationState,
    classifications: Vec<ReservationClassification>,
    types: Vec<ReservationType>,
    agenda: Option<OfficeAgenda>,
}

impl<'a, R: Repository> ReservationBooking<'a, R> {
    pub fn new(api: &'a TawseekApi<R>, office_id: OfficeId, language: Language) -> Self {
        ReservationBooking {
            api,
            office_id,
            language,
            form: ReservationFormState::default(),
            national_id_status: NationalIdValidationState::Idle,
            classifications: Vec::new(),
            types: Vec::new(),
            agenda: None,
        }
    }

    pub fn form(&self) -> &ReservationFormState {
        &self.form
    }

    pub fn national_id_status(&self) -> &NationalIdValidationState {
        &self.national_id_status
    }

    pub fn classifications(&self) -> &[ReservationClassification] {
        &self.classifications
    }

    pub fn types(&self) -> &[ReservationType] {
        &self.types
    }

    pub fn agenda(&self) -> Option<&OfficeAgenda> {
        self.agenda.as_ref()
    }

    pub async fn load_classifications(&mut self) -> Result<&[ReservationClassification]> {
        self.classifications = self.api.classifications(self.office_id).await?;
        Ok(&self.classifications)
    }

    /// Selects a classification. The selected type, the type list and
    /// everything derived from the agenda are dropped before the types of
    /// the new classification are fetched.
    pub async fn select_classification(&mut self, code: &str) -> Result<&[ReservationType]> {
        let Some(classification) = self
            .classifications
            .iter()
            .find(|c| c.code == code)
            .cloned()
        else {
            return Err(single_error(
                keys::CLASSIFICATION,
                Message::ClassificationRequired,
                self.language,
            ));
        };

        self.form = ReservationFormState {
            selected_classification: Some(classification),
            classification_error: None,
            selected_type: None,
            appointment_date: String::new(),
            selected_time: None,
            ..self.form.clone()
        };
        self.types.clear();
        self.agenda = None;

        self.types = self.api.types(self.office_id, code).await?;
        Ok(&self.types)
    }

    /// Selects a type among the ones loaded for the current classification.
    pub fn select_type(&mut self, code: &str) -> Result<()> {
        let Some(reservation_type) = self.types.iter().find(|t| t.code == code).cloned() else {
            return Err(single_error(keys::TYPE, Message::TypeRequired, self.language));
        };
        self.form = ReservationFormState {
            selected_type: Some(reservation_type),
            type_error: None,
            appointment_date: String::new(),
            selected_time: None,
            ..self.form.clone()
        };
        self.agenda = None;
        Ok(())
    }

    pub async fn load_agenda(&mut self) -> Result<&OfficeAgenda> {
        let (Some(classification), Some(reservation_type)) =
            (&self.form.selected_classification, &self.form.selected_type)
        else {
            return Err(single_error(keys::TYPE, Message::TypeRequired, self.language));
        };
        let agenda = self
            .api
            .agenda(self.office_id, &classification.code, &reservation_type.code)
            .await?;
        info!(
            "Agenda for office {}: {} days, VIP flag {}",
            self.office_id.0,
            agenda.days.len(),
            agenda.vip_flag
        );
        Ok(self.agenda.insert(agenda))
    }

    pub fn strategy(&self) -> Option<ReservationStrategy> {
        self.agenda.as_ref().map(|agenda| agenda.vip_flag.strategy())
    }

    pub fn available_dates(&self) -> Vec<String> {
        self.agenda
            .as_ref()
            .map(OfficeAgenda::available_dates)
            .unwrap_or_default()
    }

    pub fn available_slots(&self, ui_date: &str) -> Vec<String> {
        match &self.agenda {
            Some(agenda) => agenda.vip_flag.strategy().slots(agenda, ui_date),
            None => Vec::new(),
        }
    }

    /// Sets the appointment date; a previously picked time no longer applies.
    pub fn set_appointment_date(&mut self, ui_date: &str) {
        self.form = ReservationFormState {
            appointment_date: ui_date.trim().to_string(),
            appointment_date_error: None,
            selected_time: None,
            ..self.form.clone()
        };
    }

    /// Picks a time or period label. Once the agenda is loaded only the
    /// slots it offers for the selected date are accepted.
    pub fn select_time(&mut self, slot: &str) -> Result<()> {
        if self.agenda.is_some()
            && !self
                .available_slots(&self.form.appointment_date)
                .iter()
                .any(|s| s == slot)
        {
            return Err(single_error(
                keys::APPOINTMENT_TIME,
                Message::AppointmentTimeRequired,
                self.language,
            ));
        }
        self.form = ReservationFormState {
            selected_time: Some(slot.to_string()),
            time_error: None,
            ..self.form.clone()
        };
        Ok(())
    }

    pub fn set_confirmation(&mut self, checked: bool) {
        self.form = ReservationFormState {
            confirmation_checked: checked,
            confirmation_error: None,
            ..self.form.clone()
        };
    }

    /// Updates the national ID. Any change resets the server check; a
    /// well-formed ID is sent to the server right away.
    pub async fn update_national_id(&mut self, national_id: &str) -> &NationalIdValidationState {
        self.form = ReservationFormState {
            national_id: national_id.trim().to_string(),
            national_id_error: None,
            ..self.form.clone()
        };
        self.national_id_status = NationalIdValidationState::Idle;

        if !is_well_formed_national_id(&self.form.national_id) {
            return &self.national_id_status;
        }

        self.national_id_status = NationalIdValidationState::Loading;
        let inquiry = BookingInquiry::new(self.api, self.language);
        self.national_id_status = match inquiry
            .validate_national_id_with_api(&self.form.national_id)
            .await
        {
            Ok(true) => NationalIdValidationState::Valid,
            Ok(false) => NationalIdValidationState::Invalid(
                Message::NationalIdNotVerified.text(self.language).to_string(),
            ),
            Err(Error::Domain { message, .. }) => NationalIdValidationState::Invalid(message),
            Err(err) => {
                warn!("National ID check failed: {err}");
                NationalIdValidationState::Error(err.user_message(self.language))
            }
        };
        &self.national_id_status
    }

    /// Validates the whole form and stores the per-field errors on it.
    pub fn validate(&mut self) -> ValidationResult {
        let result = ReservationFormValidator::new(self.language).validate(&ReservationDraft {
            form: &self.form,
            national_id_status: &self.national_id_status,
        });
        self.form = match &result {
            ValidationResult::Success => self.form.without_errors(),
            ValidationResult::Error(errors) => self.form.with_errors(errors),
        };
        result
    }

    /// The form as renderable fields, carrying the current errors.
    pub fn fields(&self) -> Vec<FormField> {
        let form = &self.form;
        let time_options = self
            .available_slots(&form.appointment_date)
            .into_iter()
            .map(|slot| DropDownOption {
                value: slot.clone(),
                label: slot,
            })
            .collect();

        vec![
            FormField::TextField {
                meta: FieldMeta::new(keys::NATIONAL_ID, Label::Resource(Message::LabelNationalId))
                    .mandatory()
                    .value(form.national_id.clone())
                    .error(form.national_id_error.clone()),
            },
            FormField::DropDown {
                meta: FieldMeta::new(
                    keys::CLASSIFICATION,
                    Label::Resource(Message::LabelClassification),
                )
                .mandatory()
                .value(
                    form.selected_classification
                        .as_ref()
                        .map(|c| c.code.clone())
                        .unwrap_or_default(),
                )
                .error(form.classification_error.clone()),
                options: self
                    .classifications
                    .iter()
                    .map(|c| DropDownOption {
                        value: c.code.clone(),
                        label: c.description.clone(),
                    })
                    .collect(),
            },
            FormField::DropDown {
                meta: FieldMeta::new(keys::TYPE, Label::Resource(Message::LabelType))
                    .mandatory()
                    .value(
                        form.selected_type
                            .as_ref()
                            .map(|t| t.code.clone())
                            .unwrap_or_default(),
                    )
                    .error(form.type_error.clone()),
                options: self
                    .types
                    .iter()
                    .map(|t| DropDownOption {
                        value: t.code.clone(),
                        label: t.description.clone(),
                    })
                    .collect(),
            },
            FormField::DatePicker {
                meta: FieldMeta::new(
                    keys::APPOINTMENT_DATE,
                    Label::Resource(Message::LabelAppointmentDate),
                )
                .mandatory()
                .value(form.appointment_date.clone())
                .error(form.appointment_date_error.clone()),
            },
            FormField::DropDown {
                meta: FieldMeta::new(
                    keys::APPOINTMENT_TIME,
                    Label::Resource(Message::LabelAppointmentTime),
                )
                .mandatory()
                .value(form.selected_time.clone().unwrap_or_default())
                .error(form.time_error.clone()),
                options: time_options,
            },
            FormField::CheckBox {
                meta: FieldMeta::new(
                    keys::CONFIRMATION,
                    Label::Resource(Message::LabelConfirmation),
                )
                .mandatory()
                .value(form.confirmation_checked.to_string())
                .error(form.confirmation_error.clone()),
            },
        ]
    }

    /// Validates, builds the request with the office's strategy and sends it.
    pub async fn submit(&mut self) -> Result<ReservationConfirmation> {
        if let ValidationResult::Error(errors) = self.validate() {
            return Err(Error::Validation(errors));
        }
        if self.agenda.is_none() {
            self.load_agenda().await?;
        }

        let request = {
            let form = &self.form;
            let (Some(classification), Some(reservation_type), Some(time), Some(agenda)) = (
                &form.selected_classification,
                &form.selected_type,
                &form.selected_time,
                &self.agenda,
            ) else {
                return Err(single_error(
                    keys::APPOINTMENT_TIME,
                    Message::AppointmentTimeRequired,
                    self.language,
                ));
            };
            let strategy = agenda.vip_flag.strategy();
            debug!("Submitting reservation with {strategy:?} strategy");
            strategy.build_request(&ReservationInput {
                national_id: &form.national_id,
                office_id: self.office_id,
                category_code: &classification.code,
                type_code: &reservation_type.code,
                date: &form.appointment_date,
                time,
                agenda,
            })
        };

        let confirmation = self.api.create_reservation(&request).await?;
        info!(
            "Reservation created at office {} for slot {}",
            self.office_id.0, request.reservation_slot
        );
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgendaDay, ReservePeriod};

    fn period_agenda() -> OfficeAgenda {
        OfficeAgenda {
            vip_flag: VipFlag::new("2"),
            days: vec![AgendaDay {
                date_reserved: "2025-09-20".to_string(),
                reservation_times: vec![],
                reserve_periods: vec![
                    ReservePeriod {
                        time_period_code: "P1".to_string(),
                        label: "09:00-11:00".to_string(),
                    },
                    ReservePeriod {
                        time_period_code: "P2".to_string(),
                        label: "11:00-13:00".to_string(),
                    },
                ],
            }],
        }
    }

    fn input<'a>(agenda: &'a OfficeAgenda, date: &'a str, time: &'a str) -> ReservationInput<'a> {
        ReservationInput {
            national_id: "29001011234567",
            office_id: OfficeId(12),
            category_code: "7",
            type_code: "3",
            date,
            time,
            agenda,
        }
    }

    #[test]
    fn strategy_by_flag() {
        assert_eq!(select_strategy("1"), ReservationStrategy::ExactSlot);
        assert_eq!(select_strategy("4"), ReservationStrategy::ExactSlot);
        assert_eq!(select_strategy("2"), ReservationStrategy::Period);
        assert_eq!(select_strategy("3"), ReservationStrategy::Period);
    }

    #[test]
    fn unknown_flags_fall_back_to_period() {
        for flag in ["", "0", "5", "vip", "11"] {
            assert_eq!(select_strategy(flag), ReservationStrategy::Period, "{flag:?}");
        }
    }

    #[test]
    fn api_date_conversion() {
        assert_eq!(to_api_date("20/09/2025"), "20-09-2025");
        assert_eq!(to_api_date("2025/09/20"), "2025-09-20");
        assert_eq!(to_api_date("not a date"), "not a date");
    }

    #[test]
    fn agenda_date_round_trip() {
        assert_eq!(to_agenda_date("20/09/2023").as_deref(), Some("2023-09-20"));
        assert_eq!(to_agenda_date("2023-09-20"), None);
    }

    #[test]
    fn exact_slot_request() {
        let agenda = OfficeAgenda {
            vip_flag: VipFlag::new("1"),
            days: vec![],
        };
        let req = ReservationStrategy::ExactSlot.build_request(&input(&agenda, "20/09/2025", "14:30"));
        assert_eq!(req.reservation_slot, "20-09-2025 14:30");
        assert_eq!(req.period, "");
        assert_eq!(req.request_que_vip_id, None);
        assert_eq!(req.vip_flag, VipFlag::new("1"));
    }

    #[test]
    fn period_request_looks_up_code() {
        let agenda = period_agenda();
        let req =
            ReservationStrategy::Period.build_request(&input(&agenda, "20/09/2025", "09:00-11:00"));
        assert_eq!(req.period, "P1");
        assert_eq!(req.reservation_slot, "20-09-2025 00:00");
    }

    #[test]
    fn period_lookup_miss_sends_empty_code() {
        let agenda = period_agenda();
        let wrong_label =
            ReservationStrategy::Period.build_request(&input(&agenda, "20/09/2025", "15:00-17:00"));
        assert_eq!(wrong_label.period, "");

        let wrong_day =
            ReservationStrategy::Period.build_request(&input(&agenda, "21/09/2025", "09:00-11:00"));
        assert_eq!(wrong_day.period, "");
        assert_eq!(wrong_day.reservation_slot, "21-09-2025 00:00");
    }

    #[test]
    fn slots_follow_strategy() {
        let mut agenda = period_agenda();
        agenda.days[0].reservation_times = vec!["10:00".into(), "10:30".into()];
        assert_eq!(
            ReservationStrategy::Period.slots(&agenda, "20/09/2025"),
            vec!["09:00-11:00".to_string(), "11:00-13:00".to_string()]
        );
        assert_eq!(
            ReservationStrategy::ExactSlot.slots(&agenda, "20/09/2025"),
            vec!["10:00".to_string(), "10:30".to_string()]
        );
        assert!(ReservationStrategy::ExactSlot.slots(&agenda, "01/01/2025").is_empty());
    }
}
