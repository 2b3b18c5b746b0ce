//! Splits the text of one module into `;`-terminated statements.

use itertools::Itertools;

/// Splits module text into logical statements.
///
/// `//` discards everything up to the end of the line. Every `;`
/// closes the current statement; the `;` itself is dropped, line
/// breaks and tabs inside a statement collapse to single spaces and
/// the result is trimmed. Trailing text that never reaches a `;`
/// (such as `endmodule`) is dropped, and so are empty statements.
///
/// String literals are not tracked. A `;` or `//` inside one ends
/// the statement early. Structural netlists do not carry such
/// literals, so this is left as is.
pub fn segment_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                // line comment. keep the newline so the
                // statement still gets a separator.
                while let Some(&n) = chars.peek() {
                    if n == '\n' { break }
                    chars.next();
                }
            },
            ';' => {
                let stmt = normalize(&current);
                // stray `;;` separators carry nothing.
                if !stmt.is_empty() {
                    statements.push(stmt);
                }
                current.clear();
            },
            _ => current.push(c)
        }
    }
    statements
}

/// Collapses all whitespace runs to one space and trims.
fn normalize(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Removes a `//` comment from one line.
#[inline]
pub(crate) fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(p) => &line[..p],
        None => line
    }
}
