//! Audio filename generation from a completion-suggested name.

const MAX_STEM_CHARS: usize = 64;
const FALLBACK_STEM: &str = "response";
const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '\'', '`', '<', '>', '|'];

/// Prompt asking the completion model to name a file holding `response`.
pub fn filename_prompt(response: &str) -> String {
    format!(
        "Can you give me a short but meaningful name (do not add a file extension please) for a file with the following text contents: {response}"
    )
}

/// Turn a model-suggested name into a safe `.mp3` filename.
///
/// Only the first line is used. Whitespace becomes `_`, path and quote
/// characters are dropped, and an extension the model added anyway is removed.
pub fn audio_filename(suggested: &str) -> String {
    let first_line = suggested.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut stem = first_line.trim().trim_end_matches('.');
    let ext_start = stem.len().saturating_sub(4);
    if stem.get(ext_start..).is_some_and(|ext| ext.eq_ignore_ascii_case(".mp3")) {
        stem = &stem[..ext_start];
    }

    let mut cleaned = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_whitespace() {
            if !cleaned.ends_with('_') {
                cleaned.push('_');
            }
        } else if !FORBIDDEN.contains(&c) && !c.is_control() {
            cleaned.push(c);
        }
    }

    let cleaned: String = cleaned
        .trim_matches(|c| c == '_' || c == '.')
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();

    if cleaned.is_empty() {
        format!("{FALLBACK_STEM}.mp3")
    } else {
        format!("{cleaned}.mp3")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(audio_filename("Greeting Message"), "Greeting_Message.mp3");
    }

    #[test]
    fn quotes_and_paths_are_removed() {
        assert_eq!(audio_filename("\"../etc/Weather Report\""), "etcWeather_Report.mp3");
    }

    #[test]
    fn model_added_extension_is_not_doubled() {
        assert_eq!(audio_filename("summary.MP3"), "summary.mp3");
    }

    #[test]
    fn only_the_first_line_counts() {
        assert_eq!(audio_filename("\nShort Name\nBecause it fits."), "Short_Name.mp3");
    }

    #[test]
    fn empty_suggestion_falls_back() {
        assert_eq!(audio_filename("  \"\"  "), "response.mp3");
    }

    #[test]
    fn long_names_are_capped() {
        let name = audio_filename(&"a".repeat(300));
        assert_eq!(name.len(), MAX_STEM_CHARS + ".mp3".len());
    }

    #[test]
    fn prompt_embeds_the_response() {
        assert!(filename_prompt("Hi there").ends_with("contents: Hi there"));
    }
}
