use serde_json::{Map, Value};

use crate::forms::user::UserForm;

/// Maps a backend field name onto the UI form field name. The table is an
/// explicit finite mapping; anything not listed passes through unchanged,
/// including multi-underscore names such as `birthdate_from`.
fn form_field(field: &str) -> &str {
    match field {
        "first_name" => "firstName",
        "last_name" => "lastName",
        other => other,
    }
}

/// Applies a backend validation `details` payload onto the form. Messages for
/// fields the form does not know land on the form itself; a non-array value
/// for a field is skipped without error.
pub fn apply(form: &mut UserForm, details: &Map<String, Value>) {
    for (field, messages) in details {
        let target = form_field(field);

        let messages = match messages.as_array() {
            Some(messages) => messages,
            None => continue,
        };

        for message in messages {
            let message = match message {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };

            if form.has_field(target) {
                form.add_field_error(target, &message);
            } else {
                form.add_error(&message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_maps_backend_field_names_onto_form_fields() {
        let mut form = UserForm::default();

        apply(
            &mut form,
            &details(json!({"first_name": ["required"], "last_name": ["too long"]})),
        );

        assert_eq!(form.errors_for("firstName"), ["required"]);
        assert_eq!(form.errors_for("lastName"), ["too long"]);
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_identity_mapping_for_other_fields() {
        let mut form = UserForm::default();

        apply(&mut form, &details(json!({"gender": ["pick one"]})));

        assert_eq!(form.errors_for("gender"), ["pick one"]);
    }

    #[test]
    fn test_unknown_field_goes_to_form_level_errors() {
        let mut form = UserForm::default();

        apply(&mut form, &details(json!({"birthdate_from": ["out of range"]})));

        assert!(form.errors_for("birthdate_from").is_empty());
        assert_eq!(form.errors, ["out of range"]);
    }

    #[test]
    fn test_non_array_messages_are_skipped() {
        let mut form = UserForm::default();

        apply(
            &mut form,
            &details(json!({"first_name": "required", "gender": 7})),
        );

        assert!(form.errors_for("firstName").is_empty());
        assert!(form.errors_for("gender").is_empty());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_multiple_messages_per_field() {
        let mut form = UserForm::default();

        apply(
            &mut form,
            &details(json!({"first_name": ["required", "too short"]})),
        );

        assert_eq!(form.errors_for("firstName"), ["required", "too short"]);
    }
}
