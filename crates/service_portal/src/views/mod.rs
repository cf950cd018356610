//! Server-rendered HTML.
//!
//! Every view is a struct implementing [`std::fmt::Display`]; handlers turn
//! them into `Html<String>` with `to_string()`. Text coming from the data
//! service or the user is always written through [`Escaped`].

pub mod components;
pub mod layout;
pub mod pages;

use std::fmt;

/// HTML-escaped text.
///
/// # Examples
/// ```
/// use service_portal::views::Escaped;
///
/// assert_eq!(
///     Escaped("<b>\"R&D\"</b>").to_string(),
///     "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut last = 0;
        for (i, c) in self.0.char_indices() {
            let replacement = match c {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' => "&quot;",
                '\'' => "&#39;",
                _ => continue,
            };
            f.write_str(&self.0[last..i])?;
            f.write_str(replacement)?;
            last = i + c.len_utf8();
        }
        f.write_str(&self.0[last..])
    }
}

/// Owned escaped copy of `text`
pub fn escape(text: &str) -> String {
    Escaped(text).to_string()
}

/// Amount in euros with French grouping, e.g. `1 234,50 €`.
pub fn format_eur(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(digit);
    }
    format!(
        "{}{},{:02}\u{a0}€",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

/// Percentage with an explicit sign and one decimal, e.g. `+6.1%`.
pub fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}

/// Query-string component encoding for links built by the views.
pub fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
