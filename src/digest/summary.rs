//! Prompts for the group chat summary.

use super::DigestProfile;
use crate::types::DigestKind;

/// Hard cap on the final summary, in characters.
pub const SUMMARY_MAX_CHARS: usize = 2500;

pub fn profile() -> DigestProfile {
    DigestProfile {
        kind: DigestKind::Summary,
        partial_prompt,
        unify_prompt,
        max_chars: SUMMARY_MAX_CHARS,
        empty_message: "No messages to summarize.",
    }
}

fn partial_prompt(chunk: &str, index: usize, total: usize) -> String {
    format!(
        "This is chunk {index}/{total} of a large group chat.\n\
         Summarize it in 2 bullet points (very concise):\n\n\
         {chunk}\n"
    )
}

fn unify_prompt(partials: &str) -> String {
    format!(
        "You have multiple short partial summaries below.\n\
         Combine them into ONE final summary, strictly under {SUMMARY_MAX_CHARS} characters.\n\
         Use at most 3 bullet points, plus 1 concluding sentence.\n\n\
         PARTIAL SUMMARIES:\n{partials}\n\n\
         Now produce the final short summary (<{SUMMARY_MAX_CHARS} chars)."
    )
}
