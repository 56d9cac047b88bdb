//! Helpers for build.rs
//!
//! Kept free of external crates so the tests run with
//! `rustc --test build_support.rs`.

/// Inner width of the error box
const BOX_WIDTH: usize = 64;

/// Format error message lines with box drawing
///
/// Lines longer than the box are cut on a character boundary and marked
/// with `...`.
pub fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| format!("║  {:<width$} ║", truncate(line), width = BOX_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(line: &str) -> String {
    if line.chars().count() <= BOX_WIDTH {
        return line.to_string();
    }
    match line.char_indices().nth(BOX_WIDTH - 3) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_padded() {
        let out = format_error_lines("bad key");
        assert!(out.starts_with("║  bad key "));
        assert_eq!(out.chars().count(), BOX_WIDTH + 5);
    }

    #[test]
    fn test_long_line_truncated() {
        let line = "x".repeat(100);
        let out = format_error_lines(&line);
        assert!(out.contains(&format!("{}...", "x".repeat(61))));
        assert_eq!(out.chars().count(), BOX_WIDTH + 5);
    }

    #[test]
    fn test_multibyte_at_cut_point() {
        // Byte 61 falls inside a two-byte character
        let line = format!("{}é{}", "a".repeat(60), "b".repeat(40));
        let out = format_error_lines(&line);
        assert!(out.contains(&format!("{}é...", "a".repeat(60))));
        assert_eq!(out.chars().count(), BOX_WIDTH + 5);
    }

    #[test]
    fn test_each_line_boxed() {
        let out = format_error_lines("first\nsecond");
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().all(|l| l.starts_with('║') && l.ends_with('║')));
    }
}
