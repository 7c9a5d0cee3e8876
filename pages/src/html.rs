/// Escape text for insertion into HTML
pub fn escape(text: &str) -> String {
    tera::escape_html(text)
}

/// Escape text and turn its line breaks into `<br>`
pub fn multiline(text: &str) -> String {
    escape(text).replace("\r\n", "\n").replace('\n', "<br>")
}

/// A `<p>` holding a single escaped message
pub fn message(text: &str) -> String {
    format!("<p>{}</p>", escape(text))
}
