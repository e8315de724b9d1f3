use std::collections::HashMap;

use chrono::NaiveDate;

use super::user::GENDER_CHOICES;

/// Page sizes offered by the filter form's select box. Other sizes can still
/// arrive through the raw query string and are handled by the query factory.
pub const AVAILABLE_PAGE_SIZES: [i64; 2] = [50, 100];

/// Bound state of the GET filter form above the users table. Everything is
/// optional; values that do not bind cleanly are dropped rather than raised.
#[derive(Debug, Clone, Default)]
pub struct UsersFilterData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate_from: Option<NaiveDate>,
    pub birthdate_to: Option<NaiveDate>,
    pub page_size: Option<i64>,
}

impl UsersFilterData {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            first_name: non_empty(params.get("first_name")),
            last_name: non_empty(params.get("last_name")),
            gender: non_empty(params.get("gender"))
                .filter(|gender| GENDER_CHOICES.contains(&gender.as_str())),
            birthdate_from: parse_date(params.get("birthdate_from")),
            birthdate_to: parse_date(params.get("birthdate_to")),
            page_size: params
                .get("page_size")
                .and_then(|value| value.parse().ok())
                .filter(|value| AVAILABLE_PAGE_SIZES.contains(value)),
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.is_empty()).cloned()
}

fn parse_date(value: Option<&String>) -> Option<NaiveDate> {
    value.and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}
