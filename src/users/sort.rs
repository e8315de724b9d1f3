/// Column shown in the users table; every column is sortable.
#[derive(Debug, Clone, Copy)]
pub struct SortColumn {
    pub field: &'static str,
    pub label: &'static str,
}

pub const TABLE_COLUMNS: [SortColumn; 5] = [
    SortColumn {
        field: "id",
        label: "ID",
    },
    SortColumn {
        field: "first_name",
        label: "First name",
    },
    SortColumn {
        field: "last_name",
        label: "Last name",
    },
    SortColumn {
        field: "birthdate",
        label: "Birthdate",
    },
    SortColumn {
        field: "gender",
        label: "Gender",
    },
];

/// Sortable fields that are not rendered as table columns.
pub const EXTRA_SORT_FIELDS: [&str; 2] = ["inserted_at", "updated_at"];

/// All accepted `sort_by` values, deduplicated, column order first.
pub fn allowed_fields() -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = TABLE_COLUMNS.iter().map(|column| column.field).collect();

    for field in EXTRA_SORT_FIELDS {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }

    fields
}
