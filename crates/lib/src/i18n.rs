use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "arabic" => Ok(Language::Arabic),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Keys of every user-facing string the core produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    NationalIdRequired,
    NationalIdLength,
    NationalIdDigitsOnly,
    NationalIdNotVerified,
    ClassificationRequired,
    TypeRequired,
    AppointmentDateRequired,
    AppointmentTimeRequired,
    ConfirmationRequired,
    FieldRequired,
    FileTypeNotAllowed,
    FileTooLarge,
    GenericNetworkError,
    UnexpectedServerResponse,
    LabelNationalId,
    LabelClassification,
    LabelType,
    LabelAppointmentDate,
    LabelAppointmentTime,
    LabelConfirmation,
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        match language {
            Language::Arabic => self.arabic(),
            Language::English => self.english(),
        }
    }

    fn arabic(self) -> &'static str {
        match self {
            Message::NationalIdRequired => "الرقم القومي مطلوب",
            Message::NationalIdLength => "الرقم القومي يجب أن يتكون من 14 رقم",
            Message::NationalIdDigitsOnly => "الرقم القومي يجب أن يحتوي على أرقام فقط",
            Message::NationalIdNotVerified => "لم يتم التحقق من الرقم القومي",
            Message::ClassificationRequired => "يرجى اختيار التصنيف",
            Message::TypeRequired => "يرجى اختيار النوع",
            Message::AppointmentDateRequired => "يرجى اختيار تاريخ الموعد",
            Message::AppointmentTimeRequired => "يرجى اختيار وقت الموعد",
            Message::ConfirmationRequired => "يرجى الموافقة على الإقرار",
            Message::FieldRequired => "هذا الحقل مطلوب",
            Message::FileTypeNotAllowed => "نوع الملف غير مسموح به",
            Message::FileTooLarge => "حجم الملف أكبر من المسموح",
            Message::GenericNetworkError => "حدث خطأ في الاتصال، يرجى المحاولة مرة أخرى",
            Message::UnexpectedServerResponse => "استجابة غير متوقعة من الخادم",
            Message::LabelNationalId => "الرقم القومي",
            Message::LabelClassification => "التصنيف",
            Message::LabelType => "النوع",
            Message::LabelAppointmentDate => "تاريخ الموعد",
            Message::LabelAppointmentTime => "وقت الموعد",
            Message::LabelConfirmation => "أقر بصحة البيانات المدخلة",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Message::NationalIdRequired => "National ID is required",
            Message::NationalIdLength => "National ID must be 14 digits",
            Message::NationalIdDigitsOnly => "National ID must contain digits only",
            Message::NationalIdNotVerified => "National ID has not been verified",
            Message::ClassificationRequired => "Please select a classification",
            Message::TypeRequired => "Please select a type",
            Message::AppointmentDateRequired => "Please select an appointment date",
            Message::AppointmentTimeRequired => "Please select an appointment time",
            Message::ConfirmationRequired => "Please confirm the declaration",
            Message::FieldRequired => "This field is required",
            Message::FileTypeNotAllowed => "File type is not allowed",
            Message::FileTooLarge => "File is larger than allowed",
            Message::GenericNetworkError => "A connection error occurred, please try again",
            Message::UnexpectedServerResponse => "Unexpected response from server",
            Message::LabelNationalId => "National ID",
            Message::LabelClassification => "Classification",
            Message::LabelType => "Type",
            Message::LabelAppointmentDate => "Appointment date",
            Message::LabelAppointmentTime => "Appointment time",
            Message::LabelConfirmation => "I confirm the entered data is correct",
        }
    }
}
