use std::collections::HashMap;

/// List-view parameters worth preserving across a redirect after a mutation.
pub const KEYS: [&str; 9] = [
    "first_name",
    "last_name",
    "gender",
    "birthdate_from",
    "birthdate_to",
    "sort_by",
    "sort_dir",
    "page",
    "page_size",
];

/// Collects the parameters to re-append to the redirect URL, preferring a
/// posted form value over the query string and dropping empty values.
pub fn from_request(
    form: &HashMap<String, String>,
    query: &HashMap<String, String>,
) -> Vec<(String, String)> {
    let mut params = Vec::new();

    for key in KEYS {
        let value = form.get(key).or_else(|| query.get(key));

        if let Some(value) = value {
            if !value.is_empty() {
                params.push((key.to_string(), value.clone()));
            }
        }
    }

    params
}

/// Users index URL with the preserved parameters appended.
pub fn index_url(params: &[(String, String)]) -> String {
    if params.is_empty() {
        return "/users".to_string();
    }

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }

    format!("/users?{}", serializer.finish())
}
