use crate::buffer::BufferStats;
use crate::error::InsightError;
use crate::session::{AnalyzeOutcome, Reply};

/// Telegram caps messages at 4096 UTF-16 code units
pub const MAX_MESSAGE_LEN: usize = 4000;

pub const WELCOME: &str = "👋 Welcome to Daily Insights Bot!\n\n\
Send me your notes during the day.\n\
Send /analyze to get your daily summary.";

pub const NOTHING_COLLECTED: &str = "📭 No messages found for today";

pub const UNAUTHORIZED: &str = "❌ Unauthorized";

pub fn render_outcome(outcome: &AnalyzeOutcome) -> String {
    match outcome {
        AnalyzeOutcome::NothingCollected => NOTHING_COLLECTED.to_string(),
        AnalyzeOutcome::Analyzed(reply) => render_reply(reply),
    }
}

/// Header, summary, saved links, then storage warnings
pub fn render_reply(reply: &Reply) -> String {
    let mut out = format!(
        "📊 DAILY INSIGHTS {} ({} notes)\n{}\n\n{}",
        reply.day,
        reply.entry_count,
        "=".repeat(30),
        reply.summary.trim_end()
    );

    if !reply.links.is_empty() {
        out.push_str("\n\n🔗 Saved:");
        for link in &reply.links {
            out.push_str(&format!("\n• {}: {}", link.kind.label(), link.url));
        }
    }

    for warning in &reply.warnings {
        out.push_str(&format!("\n\n⚠️ {}", warning));
    }

    out
}

pub fn render_error(err: &InsightError) -> String {
    match err {
        InsightError::Permission(_) => UNAUTHORIZED.to_string(),
        InsightError::Analysis(e) => format!(
            "❌ Analysis failed: {}\n\nYour notes were kept. Send /analyze to try again.",
            e.message
        ),
    }
}

pub fn render_stats(stats: &BufferStats) -> String {
    match (stats.day, stats.entry_count) {
        (Some(day), count) if count > 0 => {
            format!("📝 {} notes collected for {}", count, day)
        }
        _ => NOTHING_COLLECTED.to_string(),
    }
}

/// Split `text` into chunks of at most `max_len` UTF-16 code units
///
/// Breaks between lines where possible; a single line longer than the limit
/// is cut at character boundaries, never inside a surrogate pair.
/// Concatenating the chunks yields `text`.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    // Room for at least one astral-plane character
    let max_len = max_len.max(2);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);

        if current_len + line_len > max_len && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_len {
            for c in line.chars() {
                if current_len + c.len_utf16() > max_len {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(c);
                current_len += c.len_utf16();
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Message length as Telegram counts it
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
