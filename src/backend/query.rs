use chrono::NaiveDate;

/// Sort direction accepted by the backend list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Filter, sort and pagination criteria for one list request. Built fresh per
/// request, never persisted.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate_from: Option<NaiveDate>,
    pub birthdate_to: Option<NaiveDate>,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub page: i64,
    pub page_size: i64,
}

impl ListQuery {
    /// Flattens the query into backend parameter pairs. Sort and paging keys
    /// are always present; a filter key only when its value is non-empty.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("sort_by", self.sort_by.clone()),
            ("sort_dir", self.sort_dir.as_str().to_string()),
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];

        if let Some(first_name) = non_empty(self.first_name.as_deref()) {
            query.push(("first_name", first_name.to_string()));
        }

        if let Some(last_name) = non_empty(self.last_name.as_deref()) {
            query.push(("last_name", last_name.to_string()));
        }

        if let Some(gender) = non_empty(self.gender.as_deref()) {
            query.push(("gender", gender.to_string()));
        }

        if let Some(from) = self.birthdate_from {
            query.push(("birthdate_from", from.format("%Y-%m-%d").to_string()));
        }

        if let Some(to) = self.birthdate_to {
            query.push(("birthdate_to", to.format("%Y-%m-%d").to_string()));
        }

        query
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> ListQuery {
        ListQuery {
            first_name: None,
            last_name: None,
            gender: None,
            birthdate_from: None,
            birthdate_to: None,
            sort_by: "id".to_string(),
            sort_dir: SortDir::Asc,
            page: 1,
            page_size: 20,
        }
    }

    #[test]
    fn test_always_includes_sort_and_paging_keys() {
        let mut query = query();
        query.first_name = Some(String::new());

        assert_eq!(
            query.to_query(),
            vec![
                ("sort_by", "id".to_string()),
                ("sort_dir", "asc".to_string()),
                ("page", "1".to_string()),
                ("page_size", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_includes_non_empty_filters_and_formatted_dates() {
        let mut query = query();
        query.first_name = Some("Jan".to_string());
        query.birthdate_from = NaiveDate::from_ymd_opt(2000, 5, 15);

        let pairs = query.to_query();

        assert!(pairs.contains(&("first_name", "Jan".to_string())));
        assert!(pairs.contains(&("birthdate_from", "2000-05-15".to_string())));
        assert!(!pairs.iter().any(|(key, _)| *key == "last_name"));
        assert!(!pairs.iter().any(|(key, _)| *key == "gender"));
        assert!(!pairs.iter().any(|(key, _)| *key == "birthdate_to"));
    }

    #[test]
    fn test_sort_keys_come_before_filters() {
        let mut query = query();
        query.gender = Some("female".to_string());

        let keys: Vec<&str> = query.to_query().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["sort_by", "sort_dir", "page", "page_size", "gender"]);
    }

    #[test]
    fn test_sort_dir_parse_and_toggle() {
        assert_eq!(SortDir::parse("asc"), Some(SortDir::Asc));
        assert_eq!(SortDir::parse("desc"), Some(SortDir::Desc));
        assert_eq!(SortDir::parse("sideways"), None);
        assert_eq!(SortDir::Asc.toggled(), SortDir::Desc);
    }
}
