//! Display text formatting shared by song, artist, and album views
//!
//! Provides consistent formatting of track lengths, release years, and
//! truncated labels.

/// Milliseconds per second
const MS_PER_SECOND: u64 = 1000;

/// Format a track duration as `M:SS`.
///
/// Minutes are not capped, so long tracks render as e.g. `72:05`.
/// Sub-second remainders are dropped.
///
/// # Examples
///
/// ```
/// use tunescope_common::display::song_length;
///
/// assert_eq!(song_length(233_712), "3:53");
/// assert_eq!(song_length(5_000), "0:05");
/// assert_eq!(song_length(0), "0:00");
/// ```
pub fn song_length(duration_ms: u64) -> String {
    let total_seconds = duration_ms / MS_PER_SECOND;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
///
/// # Examples
///
/// ```
/// use tunescope_common::display::truncate_text;
///
/// assert_eq!(truncate_text("Shape of You", 15), "Shape of You");
/// assert_eq!(truncate_text("Thinking Out Loud (Live)", 15), "Thinking Out Lo...");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Year portion of a catalog release date (`YYYY`, `YYYY-MM`, or `YYYY-MM-DD`)
pub fn release_year(release_date: &str) -> &str {
    match release_date.char_indices().nth(4) {
        Some((byte_index, _)) => &release_date[..byte_index],
        None => release_date,
    }
}

/// Join artist names with `separator`, e.g. `", "` for list rows or `"  ·  "`
/// for the song header.
pub fn join_artist_names<'a, I>(names: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().collect::<Vec<_>>().join(separator)
}
