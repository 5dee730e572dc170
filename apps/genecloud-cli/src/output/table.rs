//! Table display helpers for CLI commands

/// Truncate a string for table display, handling Unicode safely.
///
/// If the string exceeds `max_len` characters, it is truncated with "..."
/// appended.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Render rows as a left-aligned table with a header and separator
///
/// Cells longer than `max_width` characters are truncated.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate(c, max_width)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![format_row(header.as_slice()), format_row(separator.as_slice())];
    lines.extend(cells.iter().map(|row| format_row(row.as_slice())));
    lines.join("\n")
}

/// Display an optional value, using "-" when absent
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("hello world this is long", 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_unicode() {
        let result = truncate("héllo wörld café", 10);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["an-1".to_string(), "SUCCEEDED".to_string()],
            vec!["an-22".to_string(), "FAILED".to_string()],
        ];
        let table = render_table(&["ID", "STATUS"], &rows, 40);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID     STATUS");
        assert_eq!(lines[1], "-----  ---------");
        assert_eq!(lines[2], "an-1   SUCCEEDED");
        assert_eq!(lines[3], "an-22  FAILED");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("x")), "x");
    }
}
