use std::collections::BTreeMap;

use crate::i18n::{Language, Message};
use crate::model::{ReservationClassification, ReservationType};

pub const NATIONAL_ID_LENGTH: usize = 14;

/// Keys of the reservation form fields, shared by validation errors and
/// the [`crate::FormField`] projection of the form.
pub mod keys {
    pub const NATIONAL_ID: &str = "nationalId";
    pub const CLASSIFICATION: &str = "classification";
    pub const TYPE: &str = "type";
    pub const APPOINTMENT_DATE: &str = "appointmentDate";
    pub const APPOINTMENT_TIME: &str = "appointmentTime";
    pub const CONFIRMATION: &str = "confirmation";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Success,
    Error(BTreeMap<&'static str, String>),
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success)
    }

    pub fn errors(&self) -> Option<&BTreeMap<&'static str, String>> {
        match self {
            ValidationResult::Success => None,
            ValidationResult::Error(errors) => Some(errors),
        }
    }
}

pub trait Validator<T: ?Sized> {
    fn validate(&self, input: &T) -> ValidationResult;
}

/// Server-side check of the national ID entered in the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NationalIdValidationState {
    #[default]
    Idle,
    Loading,
    Valid,
    Invalid(String),
    Error(String),
}

impl NationalIdValidationState {
    pub fn is_valid(&self) -> bool {
        matches!(self, NationalIdValidationState::Valid)
    }
}

/// Everything the user has entered in the booking form so far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReservationFormState {
    pub national_id: String,
    pub national_id_error: Option<String>,
    pub selected_classification: Option<ReservationClassification>,
    pub classification_error: Option<String>,
    pub selected_type: Option<ReservationType>,
    pub type_error: Option<String>,
    /// `dd/MM/yyyy`
    pub appointment_date: String,
    pub appointment_date_error: Option<String>,
    /// Raw `HH:mm` for exact-slot offices, the period label otherwise.
    pub selected_time: Option<String>,
    pub time_error: Option<String>,
    pub confirmation_checked: bool,
    pub confirmation_error: Option<String>,
}

impl ReservationFormState {
    /// Returns a copy with every error replaced by the ones in `errors`.
    pub fn with_errors(&self, errors: &BTreeMap<&'static str, String>) -> Self {
        let get = |key: &str| errors.get(key).cloned();
        ReservationFormState {
            national_id_error: get(keys::NATIONAL_ID),
            classification_error: get(keys::CLASSIFICATION),
            type_error: get(keys::TYPE),
            appointment_date_error: get(keys::APPOINTMENT_DATE),
            time_error: get(keys::APPOINTMENT_TIME),
            confirmation_error: get(keys::CONFIRMATION),
            ..self.clone()
        }
    }

    pub fn without_errors(&self) -> Self {
        self.with_errors(&BTreeMap::new())
    }
}

/// Input of [`ReservationFormValidator`]: the form plus the result of the
/// asynchronous national ID check.
pub struct ReservationDraft<'a> {
    pub form: &'a ReservationFormState,
    pub national_id_status: &'a NationalIdValidationState,
}

pub struct ReservationFormValidator {
    language: Language,
}

impl ReservationFormValidator {
    pub fn new(language: Language) -> Self {
        ReservationFormValidator { language }
    }

    fn national_id_error(&self, draft: &ReservationDraft<'_>) -> Option<String> {
        let id = draft.form.national_id.trim();
        if id.is_empty() {
            return Some(Message::NationalIdRequired.text(self.language).to_string());
        }
        if id.chars().count() != NATIONAL_ID_LENGTH {
            return Some(Message::NationalIdLength.text(self.language).to_string());
        }
        match draft.national_id_status {
            NationalIdValidationState::Valid => None,
            NationalIdValidationState::Invalid(reason) if !reason.trim().is_empty() => {
                Some(reason.clone())
            }
            _ => Some(Message::NationalIdNotVerified.text(self.language).to_string()),
        }
    }
}

impl<'a> Validator<ReservationDraft<'a>> for ReservationFormValidator {
    fn validate(&self, draft: &ReservationDraft<'a>) -> ValidationResult {
        let text = |message: Message| message.text(self.language).to_string();
        let form = draft.form;
        let mut errors = BTreeMap::new();

        if let Some(err) = self.national_id_error(draft) {
            errors.insert(keys::NATIONAL_ID, err);
        }
        if form.selected_classification.is_none() {
            errors.insert(keys::CLASSIFICATION, text(Message::ClassificationRequired));
        }
        if form.selected_type.is_none() {
            errors.insert(keys::TYPE, text(Message::TypeRequired));
        }
        if form.appointment_date.trim().is_empty() {
            errors.insert(keys::APPOINTMENT_DATE, text(Message::AppointmentDateRequired));
        }
        if form.selected_time.is_none() {
            errors.insert(keys::APPOINTMENT_TIME, text(Message::AppointmentTimeRequired));
        }
        if !form.confirmation_checked {
            errors.insert(keys::CONFIRMATION, text(Message::ConfirmationRequired));
        }

        if errors.is_empty() {
            ValidationResult::Success
        } else {
            ValidationResult::Error(errors)
        }
    }
}
