use crate::backend::query::SortDir;
use crate::backend::UsersPage;
use crate::csrf;
use crate::flash::FlashMessage;
use crate::forms::filter::{UsersFilterData, AVAILABLE_PAGE_SIZES};
use crate::forms::user::{UserForm, GENDER_CHOICES};
use crate::users::query_factory::ListQueryContext;
use crate::users::redirect;
use crate::users::sort::TABLE_COLUMNS;

use super::escape;
use super::layout;

/// Users index: filter form, sortable table, pagination, import button.
/// `page` is `None` when the backend call failed and the view degrades to an
/// empty listing under the flashed error.
pub fn index(
    ctx: &ListQueryContext,
    filter: &UsersFilterData,
    page: Option<&UsersPage>,
    flashes: &[FlashMessage],
    csrf_secret: &str,
) -> String {
    let params = list_params(ctx);

    let mut body = String::new();
    body.push_str(&filter_form(ctx, filter));
    body.push_str("<p><a href=\"/users/new\">New user</a></p>\n");
    body.push_str(&import_form(&params, csrf_secret));

    body.push_str("<table>\n<tr>");
    for column in TABLE_COLUMNS {
        let marker = if ctx.sort_by == column.field {
            match ctx.sort_dir {
                SortDir::Asc => " ▲",
                SortDir::Desc => " ▼",
            }
        } else {
            ""
        };
        body.push_str(&format!(
            "<th><a href=\"{}\">{}</a>{}</th>",
            escape(&sort_url(ctx, column.field)),
            escape(column.label),
            marker
        ));
    }
    body.push_str("<th>Actions</th></tr>\n");

    match page {
        Some(page) => {
            for user in &page.users {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"actions\">{}</td></tr>\n",
                    user.id,
                    escape(&user.first_name),
                    escape(&user.last_name),
                    escape(&user.birthdate),
                    escape(&user.gender),
                    row_actions(user.id, &params, csrf_secret),
                ));
            }
            body.push_str("</table>\n");
            body.push_str(&pagination(ctx, page));
        }
        None => {
            body.push_str(
                "<tr><td colspan=\"6\">The user list is currently unavailable.</td></tr>\n</table>\n",
            );
        }
    }

    layout::page("Users", flashes, &body)
}

pub fn new_form(form: &UserForm, flashes: &[FlashMessage], csrf_token: &str) -> String {
    let body = format!(
        "{}<form method=\"post\" action=\"/users/new\">\n<input type=\"hidden\" name=\"_token\" value=\"{}\">\n{}<button type=\"submit\">Create</button>\n<a href=\"/users\">Cancel</a>\n</form>\n",
        form_errors(form),
        csrf_token,
        form_fields(form),
    );

    layout::page("New user", flashes, &body)
}

pub fn edit_form(id: i64, form: &UserForm, flashes: &[FlashMessage], csrf_token: &str) -> String {
    let body = format!(
        "{}<form method=\"post\" action=\"/users/{id}/edit\">\n<input type=\"hidden\" name=\"_token\" value=\"{}\">\n{}<button type=\"submit\">Save</button>\n<a href=\"/users\">Cancel</a>\n</form>\n",
        form_errors(form),
        csrf_token,
        form_fields(form),
    );

    layout::page("Edit user", flashes, &body)
}

pub fn not_found() -> String {
    layout::page(
        "Not found",
        &[],
        "<p>The requested user does not exist.</p>\n<p><a href=\"/users\">Back to users</a></p>\n",
    )
}

pub fn access_denied() -> String {
    layout::page("Access denied", &[], "<p>Invalid or missing form token.</p>\n")
}

fn filter_form(ctx: &ListQueryContext, filter: &UsersFilterData) -> String {
    let mut form = String::from("<form class=\"filters\" method=\"get\" action=\"/users\">\n");

    form.push_str(&format!(
        "<input type=\"text\" name=\"first_name\" placeholder=\"First name\" value=\"{}\">\n",
        escape(filter.first_name.as_deref().unwrap_or("")),
    ));
    form.push_str(&format!(
        "<input type=\"text\" name=\"last_name\" placeholder=\"Last name\" value=\"{}\">\n",
        escape(filter.last_name.as_deref().unwrap_or("")),
    ));

    form.push_str("<select name=\"gender\">\n<option value=\"\"></option>\n");
    for choice in GENDER_CHOICES {
        let selected = if filter.gender.as_deref() == Some(choice) {
            " selected"
        } else {
            ""
        };
        form.push_str(&format!("<option value=\"{choice}\"{selected}>{choice}</option>\n"));
    }
    form.push_str("</select>\n");

    form.push_str(&format!(
        "<input type=\"date\" name=\"birthdate_from\" value=\"{}\">\n",
        filter
            .birthdate_from
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    ));
    form.push_str(&format!(
        "<input type=\"date\" name=\"birthdate_to\" value=\"{}\">\n",
        filter
            .birthdate_to
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    ));

    form.push_str("<select name=\"page_size\">\n<option value=\"\"></option>\n");
    for size in AVAILABLE_PAGE_SIZES {
        let selected = if filter.page_size == Some(size) {
            " selected"
        } else {
            ""
        };
        form.push_str(&format!("<option value=\"{size}\"{selected}>{size}</option>\n"));
    }
    form.push_str("</select>\n");

    // Keep the active sort when the filter form resubmits.
    form.push_str(&format!(
        "<input type=\"hidden\" name=\"sort_by\" value=\"{}\">\n",
        escape(&ctx.sort_by),
    ));
    form.push_str(&format!(
        "<input type=\"hidden\" name=\"sort_dir\" value=\"{}\">\n",
        ctx.sort_dir.as_str(),
    ));

    form.push_str("<button type=\"submit\">Filter</button>\n</form>\n");
    form
}

fn import_form(params: &[(String, String)], csrf_secret: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/users/import\">\n<input type=\"hidden\" name=\"_token\" value=\"{}\">\n{}<button type=\"submit\">Import users</button>\n</form>\n",
        csrf::token(csrf_secret, "import_users"),
        hidden_inputs(params),
    )
}

fn row_actions(id: i64, params: &[(String, String)], csrf_secret: &str) -> String {
    let edit_url = if params.is_empty() {
        format!("/users/{id}/edit")
    } else {
        format!("/users/{id}/edit?{}", encode_pairs(params))
    };

    format!(
        "<a href=\"{}\">Edit</a> <form method=\"post\" action=\"/users/{id}/delete\">\n<input type=\"hidden\" name=\"_token\" value=\"{}\">\n{}<button type=\"submit\">Delete</button>\n</form>",
        escape(&edit_url),
        csrf::token(csrf_secret, &format!("delete_user_{id}")),
        hidden_inputs(params),
    )
}

fn pagination(ctx: &ListQueryContext, page: &UsersPage) -> String {
    let meta = page.meta;
    let last_page = if meta.page_size > 0 {
        ((meta.total + meta.page_size - 1) / meta.page_size).max(1)
    } else {
        1
    };

    let mut nav = String::from("<p>");

    if meta.page > 1 {
        nav.push_str(&format!(
            "<a href=\"{}\">Previous</a> ",
            escape(&page_url(ctx, meta.page - 1)),
        ));
    }

    nav.push_str(&format!(
        "Page {} of {} ({} total)",
        meta.page, last_page, meta.total
    ));

    if meta.page < last_page {
        nav.push_str(&format!(
            " <a href=\"{}\">Next</a>",
            escape(&page_url(ctx, meta.page + 1)),
        ));
    }

    nav.push_str("</p>\n");
    nav
}

fn form_errors(form: &UserForm) -> String {
    if form.errors.is_empty() {
        return String::new();
    }

    let mut block = String::from("<ul class=\"errors\">\n");
    for error in &form.errors {
        block.push_str(&format!("<li>{}</li>\n", escape(error)));
    }
    block.push_str("</ul>\n");
    block
}

fn form_fields(form: &UserForm) -> String {
    let mut fields = String::new();

    fields.push_str(&text_field(
        "First name",
        "firstName",
        &form.first_name,
        form.errors_for("firstName"),
    ));
    fields.push_str(&text_field(
        "Last name",
        "lastName",
        &form.last_name,
        form.errors_for("lastName"),
    ));

    fields.push_str(&format!(
        "<p><label>Birthdate <input type=\"date\" name=\"birthdate\" value=\"{}\"></label></p>\n{}",
        escape(&form.birthdate_raw),
        field_errors(form.errors_for("birthdate")),
    ));

    fields.push_str("<p><label>Gender <select name=\"gender\">\n<option value=\"\"></option>\n");
    for choice in GENDER_CHOICES {
        let selected = if form.gender == choice { " selected" } else { "" };
        fields.push_str(&format!("<option value=\"{choice}\"{selected}>{choice}</option>\n"));
    }
    fields.push_str("</select></label></p>\n");
    fields.push_str(&field_errors(form.errors_for("gender")));

    fields
}

fn text_field(label: &str, name: &str, value: &str, errors: &[String]) -> String {
    format!(
        "<p><label>{} <input type=\"text\" name=\"{}\" value=\"{}\"></label></p>\n{}",
        escape(label),
        name,
        escape(value),
        field_errors(errors),
    )
}

fn field_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut block = String::from("<ul class=\"errors\">\n");
    for error in errors {
        block.push_str(&format!("<li>{}</li>\n", escape(error)));
    }
    block.push_str("</ul>\n");
    block
}

fn hidden_inputs(params: &[(String, String)]) -> String {
    let mut inputs = String::new();
    for (key, value) in params {
        inputs.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
            escape(key),
            escape(value),
        ));
    }
    inputs
}

/// The current list-view state as parameter pairs, in allow-list order.
fn list_params(ctx: &ListQueryContext) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for key in redirect::KEYS {
        if let Some(value) = ctx.ui_query.get(key) {
            if !value.is_empty() {
                params.push((key.to_string(), value.clone()));
            }
        }
    }
    params
}

fn sort_url(ctx: &ListQueryContext, field: &str) -> String {
    let dir = if ctx.sort_by == field {
        ctx.sort_dir.toggled()
    } else {
        SortDir::Asc
    };

    let mut params: Vec<(String, String)> = list_params(ctx)
        .into_iter()
        .filter(|(key, _)| key != "sort_by" && key != "sort_dir" && key != "page")
        .collect();
    params.push(("sort_by".to_string(), field.to_string()));
    params.push(("sort_dir".to_string(), dir.as_str().to_string()));

    format!("/users?{}", encode_pairs(&params))
}

fn page_url(ctx: &ListQueryContext, page: i64) -> String {
    let mut params: Vec<(String, String)> = list_params(ctx)
        .into_iter()
        .filter(|(key, _)| key != "page")
        .collect();
    params.push(("page".to_string(), page.to_string()));

    format!("/users?{}", encode_pairs(&params))
}

fn encode_pairs(params: &[(String, String)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
