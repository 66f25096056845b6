use std::fmt;

use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};

use crate::ExtractedPost;

/// Renders the note: front matter (`author`, `author_url`, `tweet_url`,
/// `date_saved`), heading, summary lines, separator, then the body verbatim.
///
/// Field order is relied upon by tooling that reads saved notes back.
pub fn render_note_document(post: &ExtractedPost, saved_at: DateTime<Utc>) -> String {
    let date_saved = saved_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let saved_display = human_saved_date(saved_at, &Local);

    format!(
        "---\nauthor: {author_q}\nauthor_url: {author_url_q}\ntweet_url: {url_q}\ndate_saved: {date_saved}\n---\n\
         # Tweet by {author}\n\n\
         **Author:** [{author}]({author_url})\n\
         **Original Tweet:** [View on Twitter]({url})\n\
         **Saved:** {saved_display}\n\n\
         ---\n\n\
         {body}\n",
        author_q = yaml_quote(&post.author_name),
        author_url_q = yaml_quote(&post.author_url),
        url_q = yaml_quote(&post.canonical_url),
        date_saved = date_saved,
        author = post.author_name,
        author_url = post.author_url,
        url = post.canonical_url,
        saved_display = saved_display,
        body = post.body_text,
    )
}

/// `March 5, 2024 at 14:30` in the given zone.
pub(crate) fn human_saved_date<Tz>(saved_at: DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    saved_at
        .with_timezone(zone)
        .format("%B %-d, %Y at %H:%M")
        .to_string()
}

fn yaml_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
