use std::collections::HashMap;

use crate::backend::query::{ListQuery, SortDir};
use crate::forms::filter::UsersFilterData;

use super::sort;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// The backend query for the users index plus the UI echo state the view
/// renders sort links and the filter form from.
#[derive(Debug, Clone)]
pub struct ListQueryContext {
    pub query: ListQuery,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub ui_query: HashMap<String, String>,
}

/// Resolves sort, paging and filter state for the users index from the raw
/// query string and the bound filter form. Unknown sort fields fall back to
/// `id`, unknown directions to ascending; page is floored at 1 and the page
/// size clamped to the supported window.
pub fn from_request(
    params: &HashMap<String, String>,
    filter: &UsersFilterData,
) -> ListQueryContext {
    let mut sort_by = params
        .get("sort_by")
        .cloned()
        .unwrap_or_else(|| "id".to_string());

    if !sort::allowed_fields().contains(&sort_by.as_str()) {
        sort_by = "id".to_string();
    }

    let sort_dir = params
        .get("sort_dir")
        .and_then(|value| SortDir::parse(value))
        .unwrap_or(SortDir::Asc);

    let page = params
        .get("page")
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);

    let page_size = filter
        .page_size
        .or_else(|| {
            params
                .get("page_size")
                .and_then(|value| value.parse::<i64>().ok())
        })
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    ListQueryContext {
        query: ListQuery {
            first_name: filter.first_name.clone(),
            last_name: filter.last_name.clone(),
            gender: filter.gender.clone(),
            birthdate_from: filter.birthdate_from,
            birthdate_to: filter.birthdate_to,
            sort_by: sort_by.clone(),
            sort_dir,
            page,
            page_size,
        },
        sort_by,
        sort_dir,
        ui_query: params.clone(),
    }
}
