//! Post-processing applied to every successful completion.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Cleans backend output for the target rendering format.
pub trait Sanitizer: Send + Sync {
    /// Strip markup the target cannot render.
    fn sanitize(&self, text: &str) -> String;

    /// Normalize emphasis markup into the target format.
    fn convert_emphasis(&self, text: &str) -> String;
}

lazy_static! {
    static ref TAG: Regex = Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("valid tag pattern");
    static ref MARKDOWN_BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern");
    static ref BOLD_SPEAKER: Regex = Regex::new(r"<b>([^@][^:]+):</b>").expect("valid speaker pattern");
}

/// Tags that survive [`HtmlSanitizer::sanitize`].
pub const ALLOWED_TAGS: &[&str] = &["b", "strong", "i", "em", "a"];

/// Sanitizer for chat clients that render a small HTML subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSanitizer;

impl Sanitizer for HtmlSanitizer {
    fn sanitize(&self, text: &str) -> String {
        TAG.replace_all(text, |caps: &Captures| {
            let name = caps[1].to_ascii_lowercase();
            if ALLOWED_TAGS.contains(&name.as_str()) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
    }

    /// `**x**` becomes `<b>x</b>`, and bold speaker labels get an `@`
    /// prefix (`<b>alice:</b>` -> `<b>@alice:</b>`).
    fn convert_emphasis(&self, text: &str) -> String {
        let bold = MARKDOWN_BOLD.replace_all(text, "<b>$1</b>");
        BOLD_SPEAKER.replace_all(&bold, "<b>@$1:</b>").into_owned()
    }
}
