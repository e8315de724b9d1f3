use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::PayloadError;

const REQUIRED_KEYS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "birthdate",
    "gender",
    "inserted_at",
    "updated_at",
];

/// User record as owned and serialized by the backend service. Timestamps
/// and the birthdate are kept as the opaque strings the backend sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
    pub gender: String,
    pub inserted_at: String,
    pub updated_at: String,
}

impl User {
    /// Decodes one user object. Every key must be present and coercible to
    /// its declared type or the whole decode fails.
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let object = value.as_object().ok_or(PayloadError::InvalidType {
            path: "data",
            expected: "object",
        })?;

        for key in REQUIRED_KEYS {
            if !object.contains_key(key) {
                return Err(PayloadError::MissingKey { path: "data", key });
            }
        }

        Ok(Self {
            id: int_value(&object["id"], "data.id")?,
            first_name: string_value(&object["first_name"], "data.first_name")?,
            last_name: string_value(&object["last_name"], "data.last_name")?,
            birthdate: string_value(&object["birthdate"], "data.birthdate")?,
            gender: string_value(&object["gender"], "data.gender")?,
            inserted_at: string_value(&object["inserted_at"], "data.inserted_at")?,
            updated_at: string_value(&object["updated_at"], "data.updated_at")?,
        })
    }
}

/// Write-side projection of a user, built from validated form state and sent
/// to the backend on create and update.
#[derive(Debug, Clone, Serialize)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub gender: String,
}

fn int_value(value: &Value, path: &'static str) -> Result<i64, PayloadError> {
    let invalid = PayloadError::InvalidType {
        path,
        expected: "integer",
    };

    match value {
        Value::Number(number) => number.as_i64().ok_or(invalid),
        Value::String(raw) if is_digits(raw) => raw.parse().map_err(|_| invalid),
        _ => Err(invalid),
    }
}

fn string_value(value: &Value, path: &'static str) -> Result<String, PayloadError> {
    match value {
        Value::String(raw) => Ok(raw.clone()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(PayloadError::InvalidType {
            path,
            expected: "string",
        }),
    }
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "id": 123,
            "first_name": "Jan",
            "last_name": "Kowalski",
            "birthdate": "1990-05-15",
            "gender": "male",
            "inserted_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-02T10:00:00Z",
        })
    }

    #[test]
    fn test_decodes_all_fields_verbatim() {
        let user = User::from_value(&payload()).unwrap();

        assert_eq!(user.id, 123);
        assert_eq!(user.first_name, "Jan");
        assert_eq!(user.last_name, "Kowalski");
        assert_eq!(user.birthdate, "1990-05-15");
        assert_eq!(user.gender, "male");
        assert_eq!(user.inserted_at, "2024-01-01T10:00:00Z");
        assert_eq!(user.updated_at, "2024-01-02T10:00:00Z");
    }

    #[test]
    fn test_coerces_id_from_digit_string() {
        let mut payload = payload();
        payload["id"] = json!("123");

        assert_eq!(User::from_value(&payload).unwrap().id, 123);
    }

    #[test]
    fn test_missing_key_names_the_key_and_path() {
        for key in REQUIRED_KEYS {
            let mut payload = payload();
            payload.as_object_mut().unwrap().remove(key);

            let error = User::from_value(&payload).unwrap_err();
            assert_eq!(error, PayloadError::MissingKey { path: "data", key });
            assert_eq!(
                error.to_string(),
                format!("Missing key \"{key}\" at data.")
            );
        }
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let error = User::from_value(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(
            error,
            PayloadError::InvalidType {
                path: "data",
                expected: "object"
            }
        );
    }

    #[test]
    fn test_rejects_uncoercible_id() {
        let mut payload = payload();
        payload["id"] = json!("12abc");

        assert!(User::from_value(&payload).is_err());
    }

    #[test]
    fn test_rejects_structured_value_in_string_field() {
        let mut payload = payload();
        payload["first_name"] = json!({"nested": true});

        assert_eq!(
            User::from_value(&payload).unwrap_err(),
            PayloadError::InvalidType {
                path: "data.first_name",
                expected: "string"
            }
        );
    }

    #[test]
    fn test_input_serializes_birthdate_as_iso_date() {
        let input = UserInput {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            gender: "male".to_string(),
        };

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(
            body,
            json!({
                "first_name": "Jan",
                "last_name": "Kowalski",
                "birthdate": "1990-05-15",
                "gender": "male",
            })
        );
    }
}
