use serde_json::Value;

/// Pagination metadata reported by the backend list endpoint, trusted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl ListMeta {
    pub fn from_value(value: &Value) -> Self {
        Self {
            page: int_or(value.get("page"), 1),
            page_size: int_or(value.get("page_size"), 20),
            total: int_or(value.get("total"), 0),
        }
    }
}

fn int_or(value: Option<&Value>, default: i64) -> i64 {
    match value {
        Some(Value::Number(number)) => number.as_i64().unwrap_or(default),
        Some(Value::String(raw)) => raw.parse().unwrap_or(default),
        _ => default,
    }
}
