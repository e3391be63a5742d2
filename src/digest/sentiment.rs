//! Prompts for the group chat sentiment reading.

use super::DigestProfile;
use crate::types::DigestKind;

/// Hard cap on the final sentiment text, in characters.
pub const SENTIMENT_MAX_CHARS: usize = 300;

pub fn profile() -> DigestProfile {
    DigestProfile {
        kind: DigestKind::Sentiment,
        partial_prompt,
        unify_prompt,
        max_chars: SENTIMENT_MAX_CHARS,
        empty_message: "No messages found for sentiment analysis.",
    }
}

// Kept detailed; the unify pass does the shortening.
fn partial_prompt(chunk: &str, index: usize, total: usize) -> String {
    format!(
        "This is chunk {index}/{total} of a group chat.\n\n\
         {chunk}\n\n\
         Analyze the sentiment and produce a short summary with:\n\
         - Overall chat group Sentiment (Bullish 🚀, Bearish 🛑, or Neutral 🤔)\n\
         - Percentages of Positive, Neutral, and Negative\n\
         - A few key topics or observations."
    )
}

fn unify_prompt(partials: &str) -> String {
    format!(
        "We have multiple partial sentiment analyses:\n\
         {partials}\n\n\
         Now produce a SINGLE, very short final sentiment result with the format:\n\
         📊 Overall chat group Sentiment: (Bullish 🚀, Bearish 🛑, or Neutral 🤔)\n\
         🔍 Sentiment Breakdown: - Positive: X%, Neutral: Y%, Negative: Z%\n\
         One short concluding sentence (max 80 characters).\n\
         Keep the entire output under {SENTIMENT_MAX_CHARS} characters total."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_content() {
        let prompt = partial_prompt("@bob: ngmi", 1, 3);
        assert!(prompt.starts_with("This is chunk 1/3 of a group chat.\n\n@bob: ngmi\n\n"));
        assert!(prompt.contains("Positive, Neutral, and Negative"));

        let unify = unify_prompt("bullish\n---\nbearish");
        assert!(unify.contains("analyses:\nbullish\n---\nbearish\n\n"));
        assert!(unify.ends_with("under 300 characters total."));
    }
}
