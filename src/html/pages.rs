//! Page renderers. Every interpolated user value goes through `encode_text`
//! or `encode_double_quoted_attribute`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::layout::{document, file_href, flashes};
use crate::session::Flash;
use crate::storage::{StoredFile, UploadPolicy};

pub fn login(pending: &[Flash]) -> String {
    let body = format!(
        "<h1>Secure Login</h1>
{flashes}
<form method=\"post\" action=\"/login\">
    <label>Username: <input type=\"text\" name=\"username\" required></label><br>
    <label>Password: <input type=\"password\" name=\"password\" required></label><br>
    <input type=\"submit\" value=\"Login\">
</form>",
        flashes = flashes(pending),
    );
    document("Secure Login", &body)
}

pub fn index(username: &str, pending: &[Flash], policy: &UploadPolicy) -> String {
    let extensions: Vec<&str> = policy.allowed_extensions().collect();
    let accept = extensions
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    let max_mb = policy.max_size_bytes() / (1024 * 1024);

    let body = format!(
        "<div class=\"card\">
    <h1>Secure File Upload System</h1>
    <small>Welcome, {username}!</small> &middot; <a href=\"/logout\">Logout</a>
</div>
{flashes}
<div class=\"card\">
    <strong>Security features active:</strong><br>
    &bull; Authentication required<br>
    &bull; File type validation ({extensions})<br>
    &bull; File size limit: {max_mb}MB<br>
    &bull; Path traversal protection<br>
    &bull; Filename sanitization
</div>
<div class=\"card\">
    <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">
        <p><strong>Select a file to upload:</strong></p>
        <input type=\"file\" name=\"file\" required accept=\"{accept}\">
        <input type=\"submit\" value=\"Upload\">
    </form>
</div>
<p><a href=\"/list-files\">View uploaded files</a></p>",
        username = encode_text(username),
        flashes = flashes(pending),
        extensions = encode_text(&extensions.join(", ")),
        accept = encode_double_quoted_attribute(&accept),
    );
    document("Secure File Upload System", &body)
}

pub fn file_list(files: &[StoredFile]) -> String {
    let entries = if files.is_empty() {
        "<p>No files uploaded yet.</p>".to_string()
    } else {
        files
            .iter()
            .map(|file| {
                format!(
                    "<div class=\"card\">
    <strong>{name}</strong> ({size} bytes)<br>
    <a href=\"{download}\">Download</a> &middot; <a href=\"{view}\">View content</a>
</div>
",
                    name = encode_text(&file.name),
                    size = file.size,
                    download = encode_double_quoted_attribute(&file_href("/files", &file.name)),
                    view = encode_double_quoted_attribute(&file_href("/view", &file.name)),
                )
            })
            .collect()
    };

    let body = format!(
        "<a href=\"/\" class=\"back-link\">&larr; Back to upload</a>
<h1>Uploaded Files</h1>
{entries}"
    );
    document("Uploaded Files", &body)
}

pub fn view(name: &str, content: &str) -> String {
    let body = format!(
        "<a href=\"/list-files\" class=\"back-link\">&larr; Back to files</a>
<h1>{name}</h1>
<div class=\"content\">{content}</div>",
        name = encode_text(name),
        content = encode_text(content),
    );
    document(&format!("View: {name}"), &body)
}

pub fn cannot_view(name: &str) -> String {
    let body = format!(
        "<h1>Cannot view this file type</h1>
<p>File: {name}</p>
<p>Only .txt files can be viewed directly.</p>
<a href=\"/list-files\">&larr; Back to files</a>",
        name = encode_text(name),
    );
    document("Cannot View File", &body)
}

pub fn not_found() -> String {
    document(
        "Not Found",
        "<h1>Not Found</h1>\n<p>The requested file does not exist.</p>\n<a href=\"/list-files\">&larr; Back to files</a>",
    )
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Error</h1>
<p>{message}</p>
<a href=\"/\">&larr; Back to upload</a>",
        message = encode_text(message),
    );
    document("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_list_escapes_names_and_encodes_links() {
        let files = vec![StoredFile::new("a&b_<x>.txt", 3)];
        let html = file_list(&files);
        assert!(html.contains("a&amp;b_&lt;x&gt;.txt"));
        assert!(html.contains("/files/a%26b_%3Cx%3E.txt"));
        assert!(!html.contains("<x>"));
    }

    #[test]
    fn test_empty_list_message() {
        assert!(file_list(&[]).contains("No files uploaded yet."));
    }

    #[test]
    fn test_view_escapes_content() {
        let html = view("notes.txt", "<script>alert(1)</script>");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_index_shows_policy_and_flashes() {
        let html = index(
            "admin",
            &[Flash::error("File type not allowed!")],
            &UploadPolicy::default(),
        );
        assert!(html.contains("Welcome, admin!"));
        assert!(html.contains("File size limit: 16MB"));
        assert!(html.contains("<div class=\"flash error\">File type not allowed!</div>"));
        assert!(html.contains(".docx,.gif,.jpeg"));
    }
}
