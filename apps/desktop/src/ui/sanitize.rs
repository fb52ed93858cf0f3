//! Escaping for server-supplied text that ends up inside markup.

const ENTITIES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#039;"),
];

/// Escapes `& < > " '`, ampersand first. `None` stands for "not a string"
/// and yields an empty string.
pub fn escape<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (raw, entity)| {
            acc.replace(*raw, entity)
        })
}

/// Reverses [`escape`]. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn unescape(markup: &str) -> String {
    ENTITIES
        .iter()
        .rev()
        .fold(markup.to_string(), |acc, (raw, entity)| {
            acc.replace(entity, &raw.to_string())
        })
}
