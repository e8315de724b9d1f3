use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{User, UserInput};

pub const BIRTHDATE_MIN: &str = "1970-01-01";
pub const BIRTHDATE_MAX: &str = "2024-12-31";

pub const GENDER_CHOICES: [&str; 2] = ["male", "female"];

/// Form field names as rendered in the HTML; backend validation details are
/// translated onto these by `users::validation`.
const FIELDS: [&str; 4] = ["firstName", "lastName", "birthdate", "gender"];

/// State of the user create/edit form: raw and parsed values plus per-field
/// and form-level errors collected from local validation and from backend
/// validation details.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub birthdate_raw: String,
    pub birthdate: Option<NaiveDate>,
    pub gender: String,
    pub field_errors: HashMap<String, Vec<String>>,
    pub errors: Vec<String>,
    pub submitted: bool,
}

impl UserForm {
    /// Binds posted form fields. Parsing failures surface later in
    /// [`UserForm::validate`], not here.
    pub fn bind(params: &HashMap<String, String>) -> Self {
        let birthdate_raw = params.get("birthdate").cloned().unwrap_or_default();

        Self {
            first_name: params.get("firstName").cloned().unwrap_or_default(),
            last_name: params.get("lastName").cloned().unwrap_or_default(),
            birthdate: NaiveDate::parse_from_str(&birthdate_raw, "%Y-%m-%d").ok(),
            birthdate_raw,
            gender: params.get("gender").cloned().unwrap_or_default(),
            submitted: true,
            ..Self::default()
        }
    }

    /// Prefills the form from an existing record for the edit view.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            birthdate: NaiveDate::parse_from_str(&user.birthdate, "%Y-%m-%d").ok(),
            birthdate_raw: user.birthdate.clone(),
            gender: user.gender.clone(),
            ..Self::default()
        }
    }

    /// Local validation, run before any backend call. Returns whether the
    /// form is clean.
    pub fn validate(&mut self) -> bool {
        if self.first_name.trim().is_empty() {
            self.add_field_error("firstName", "This field is required.");
        }

        if self.last_name.trim().is_empty() {
            self.add_field_error("lastName", "This field is required.");
        }

        match self.birthdate {
            None if self.birthdate_raw.is_empty() => {
                self.add_field_error("birthdate", "This field is required.");
            }
            None => {
                self.add_field_error("birthdate", "Enter a valid date.");
            }
            Some(date) => {
                let min = parse_bound(BIRTHDATE_MIN, NaiveDate::MIN);
                let max = parse_bound(BIRTHDATE_MAX, NaiveDate::MAX);

                if date < min || date > max {
                    self.add_field_error(
                        "birthdate",
                        &format!("Birthdate must be between {BIRTHDATE_MIN} and {BIRTHDATE_MAX}."),
                    );
                }
            }
        }

        if !GENDER_CHOICES.contains(&self.gender.as_str()) {
            self.add_field_error("gender", "Select a valid gender.");
        }

        self.is_valid()
    }

    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.errors.is_empty()
    }

    pub fn has_field(&self, name: &str) -> bool {
        FIELDS.contains(&name)
    }

    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn errors_for(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Backend input built from the bound values. Only meaningful after a
    /// successful [`UserForm::validate`].
    pub fn to_input(&self) -> Option<UserInput> {
        let birthdate = self.birthdate?;

        Some(UserInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birthdate,
            gender: self.gender.clone(),
        })
    }
}

fn parse_bound(raw: &str, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or(fallback)
}
