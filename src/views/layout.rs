use crate::flash::FlashMessage;

use super::escape;

/// Wraps page content in the shared chrome: head, heading, flash banners.
pub fn page(title: &str, flashes: &[FlashMessage], body: &str) -> String {
    let mut banners = String::new();
    for flash in flashes {
        banners.push_str(&format!(
            "<div class=\"flash flash-{}\">{}</div>\n",
            escape(&flash.level),
            escape(&flash.message)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Userdesk</title>
<style>
body {{ font-family: system-ui; margin: 2rem; }}
table {{ border-collapse: collapse; margin: 1rem 0; }}
th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.8rem; text-align: left; }}
.flash {{ padding: 0.5rem 1rem; margin: 0.5rem 0; border-radius: 4px; }}
.flash-success {{ background: #e6f7e6; }}
.flash-error {{ background: #fde8e8; }}
.errors {{ color: #b00020; margin: 0.2rem 0 0.6rem; padding-left: 1.2rem; }}
.filters input, .filters select {{ margin: 0 0.5rem 0.5rem 0; }}
.actions form {{ display: inline; }}
</style>
</head>
<body>
<h1>{title}</h1>
{banners}{body}
</body>
</html>
"#,
        title = escape(title),
        banners = banners,
        body = body,
    )
}
