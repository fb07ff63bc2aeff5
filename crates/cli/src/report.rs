//! Human-readable locations for byte offsets.

/// 1-based line and column (in chars) of `offset` in `source`.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// The line containing `offset`, with a caret under the offset.
pub fn excerpt(source: &str, offset: usize) -> String {
    let (line, column) = line_column(source, offset);
    let text = source.lines().nth(line - 1).unwrap_or("");
    let gutter = line.to_string();
    format!(
        "{} | {}\n{} | {}^",
        gutter,
        text,
        " ".repeat(gutter.len()),
        " ".repeat(column - 1)
    )
}

/// Offset of the first byte where `a` and `b` differ.
pub fn first_difference(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()))
}
