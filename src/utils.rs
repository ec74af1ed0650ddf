use unicode_segmentation::UnicodeSegmentation;

/// First line of `s`, cut to at most `max_len` graphemes, for log messages.
pub fn preview(s: &str, max_len: usize) -> String {
    let line = s.trim_start().lines().next().unwrap_or("");
    let mut graphemes = line.graphemes(true);
    let head = graphemes.by_ref().take(max_len).collect::<String>();
    if graphemes.next().is_some() {
        head + "..."
    } else {
        head
    }
}
