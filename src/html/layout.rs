//! Shared page shell and fragments.

use html_escape::encode_text;

use crate::session::Flash;

const BASE_STYLE: &str = "body { font-family: Arial, sans-serif; max-width: 700px; margin: 40px auto; padding: 20px; }
a { text-decoration: none; }
.flash { padding: 10px 15px; border-radius: 4px; margin: 10px 0; }
.flash.success { background: #d4edda; color: #155724; }
.flash.error { background: #f8d7da; color: #721c24; }
.card { border: 1px solid #ddd; padding: 15px; margin: 15px 0; border-radius: 5px; }
.back-link { color: #666; margin-bottom: 20px; display: block; }
.content { background: #f5f5f5; padding: 20px; border-radius: 5px; white-space: pre-wrap; }";

/// Wraps a body fragment in a complete HTML document.
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html>
<head>
    <meta charset=\"utf-8\">
    <title>{title}</title>
    <style>{BASE_STYLE}</style>
</head>
<body>
{body}
</body>
</html>
",
        title = encode_text(title),
    )
}

pub fn flashes(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|flash| {
            format!(
                "<div class=\"flash {}\">{}</div>\n",
                flash.kind.as_str(),
                encode_text(&flash.message)
            )
        })
        .collect()
}

/// Escapes a stored file name for use in a URL path segment.
pub fn file_href(prefix: &str, name: &str) -> String {
    format!("{prefix}/{}", urlencoding::encode(name))
}
