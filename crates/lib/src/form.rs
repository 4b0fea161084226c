use crate::i18n::{Language, Message};

/// Display text of a field, either literal or looked up per language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Text(String),
    Resource(Message),
}

impl Label {
    pub fn resolve(&self, language: Language) -> String {
        match self {
            Label::Text(text) => text.clone(),
            Label::Resource(message) => message.text(language).to_string(),
        }
    }
}

/// Attributes shared by every field variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    pub id: String,
    pub label: Label,
    /// Always string-encoded, `"true"`/`"false"` for checkboxes.
    pub value: String,
    pub error: Option<String>,
    pub mandatory: bool,
}

impl FieldMeta {
    pub fn new(id: impl Into<String>, label: Label) -> Self {
        FieldMeta {
            id: id.into(),
            label,
            value: String::new(),
            error: None,
            mandatory: false,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDownOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub name: String,
    pub national_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    TextField {
        meta: FieldMeta,
    },
    DropDown {
        meta: FieldMeta,
        options: Vec<DropDownOption>,
    },
    CheckBox {
        meta: FieldMeta,
    },
    DatePicker {
        meta: FieldMeta,
    },
    FileUpload {
        meta: FieldMeta,
        /// Lowercase extensions without the dot.
        allowed_types: Vec<String>,
        max_size_mb: u32,
    },
    OwnerList {
        meta: FieldMeta,
        owners: Vec<Owner>,
    },
}

impl FormField {
    pub fn meta(&self) -> &FieldMeta {
        match self {
            FormField::TextField { meta }
            | FormField::DropDown { meta, .. }
            | FormField::CheckBox { meta }
            | FormField::DatePicker { meta }
            | FormField::FileUpload { meta, .. }
            | FormField::OwnerList { meta, .. } => meta,
        }
    }

    fn meta_mut(&mut self) -> &mut FieldMeta {
        match self {
            FormField::TextField { meta }
            | FormField::DropDown { meta, .. }
            | FormField::CheckBox { meta }
            | FormField::DatePicker { meta }
            | FormField::FileUpload { meta, .. }
            | FormField::OwnerList { meta, .. } => meta,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().id
    }

    pub fn value(&self) -> &str {
        &self.meta().value
    }

    pub fn error(&self) -> Option<&str> {
        self.meta().error.as_deref()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.meta_mut().value = value.into();
        self
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.meta_mut().error = error;
        self
    }

    pub fn is_checked(&self) -> bool {
        match self {
            FormField::CheckBox { meta } => meta.value.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Human readable value: the option label for dropdowns, the owner
    /// names for owner lists, the raw value otherwise.
    pub fn display_value(&self) -> String {
        match self {
            FormField::DropDown { meta, options } => options
                .iter()
                .find(|opt| opt.value == meta.value)
                .map(|opt| opt.label.clone())
                .unwrap_or_else(|| meta.value.clone()),
            FormField::OwnerList { owners, .. } => owners
                .iter()
                .map(|owner| owner.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            FormField::TextField { meta }
            | FormField::CheckBox { meta }
            | FormField::DatePicker { meta }
            | FormField::FileUpload { meta, .. } => meta.value.clone(),
        }
    }

    /// True for a mandatory field that has nothing filled in.
    pub fn missing_required(&self) -> bool {
        if !self.meta().mandatory {
            return false;
        }
        match self {
            FormField::CheckBox { .. } => !self.is_checked(),
            FormField::OwnerList { owners, .. } => owners.is_empty(),
            FormField::TextField { meta }
            | FormField::DropDown { meta, .. }
            | FormField::DatePicker { meta }
            | FormField::FileUpload { meta, .. } => meta.value.trim().is_empty(),
        }
    }

    /// Checks a candidate upload against the field's type and size limits.
    /// Fields other than `FileUpload` accept nothing.
    pub fn check_file(
        &self,
        file_name: &str,
        size_bytes: u64,
        language: Language,
    ) -> Result<(), String> {
        let FormField::FileUpload {
            allowed_types,
            max_size_mb,
            ..
        } = self
        else {
            return Err(Message::FileTypeNotAllowed.text(language).to_string());
        };

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !allowed_types.is_empty() && !allowed_types.iter().any(|t| *t == extension) {
            return Err(Message::FileTypeNotAllowed.text(language).to_string());
        }

        if size_bytes > u64::from(*max_size_mb) * 1024 * 1024 {
            return Err(Message::FileTooLarge.text(language).to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> FormField {
        FormField::FileUpload {
            meta: FieldMeta::new("attachment", Label::Text("Attachment".into())).mandatory(),
            allowed_types: vec!["pdf".into(), "jpg".into()],
            max_size_mb: 2,
        }
    }

    #[test]
    fn checkbox_value_is_string_encoded() {
        let field = FormField::CheckBox {
            meta: FieldMeta::new("confirmation", Label::Resource(Message::LabelConfirmation))
                .mandatory(),
        };
        assert!(!field.is_checked());
        assert!(field.missing_required());

        let field = field.with_value("true");
        assert!(field.is_checked());
        assert!(!field.missing_required());
    }

    #[test]
    fn dropdown_displays_option_label() {
        let field = FormField::DropDown {
            meta: FieldMeta::new("classification", Label::Text("Classification".into()))
                .value("7"),
            options: vec![DropDownOption {
                value: "7".into(),
                label: "توثيق".into(),
            }],
        };
        assert_eq!(field.display_value(), "توثيق");
        assert_eq!(field.id(), "classification");
    }

    #[test]
    fn file_upload_limits() {
        let field = upload();
        assert!(field.check_file("scan.PDF", 1024, Language::English).is_ok());
        assert_eq!(
            field.check_file("scan.exe", 1024, Language::English),
            Err("File type is not allowed".to_string())
        );
        assert_eq!(
            field.check_file("scan.pdf", 3 * 1024 * 1024, Language::English),
            Err("File is larger than allowed".to_string())
        );
    }

    #[test]
    fn owner_list_requires_an_owner() {
        let empty = FormField::OwnerList {
            meta: FieldMeta::new("owners", Label::Text("Owners".into())).mandatory(),
            owners: vec![],
        };
        assert!(empty.missing_required());
        let filled = FormField::OwnerList {
            meta: FieldMeta::new("owners", Label::Text("Owners".into())).mandatory(),
            owners: vec![Owner {
                name: "Mona".into(),
                national_id: "29001011234567".into(),
            }],
        };
        assert!(!filled.missing_required());
        assert_eq!(filled.display_value(), "Mona");
    }

    #[test]
    fn with_error_replaces_error() {
        let field = FormField::TextField {
            meta: FieldMeta::new("nationalId", Label::Resource(Message::LabelNationalId)),
        }
        .with_error(Some("bad".into()));
        assert_eq!(field.error(), Some("bad"));
        assert_eq!(field.with_error(None).error(), None);
    }
}
