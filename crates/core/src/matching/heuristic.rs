//! Line-oriented checks used where the syntax tree alone is not decisive.

use log::debug;

use crate::matching::{identifier_ends, is_ident_char, SourceFile};

/// How far a parameter list may run past the line that opens it.
const MAX_SIGNATURE_LINES: usize = 8;

/// Words that put the identifier after them in statement or expression context.
const STATEMENT_KEYWORDS: &[&str] =
    &["return", "if", "else", "while", "for", "do", "switch", "case", "goto", "sizeof"];

/// Whether the file text contains the fortification marker token.
///
/// Headers carrying the marker back their prototypes with safety-wrapped
/// definitions elsewhere, so no body has to be located.
pub fn has_fortify_marker(file: &SourceFile, marker: &str) -> bool {
    !marker.is_empty() && file.text.lines().any(|line| line.contains(marker))
}

/// Look for a function opening of `target` at `declared_line` or up to
/// `window` lines around it.
///
/// An opening is `target` as a whole identifier preceded on its line by at
/// most a return type, then optional whitespace, a parameter list (which may
/// span a few lines), then `{` either on the line that closes the list or on
/// the next line that is neither blank nor a preprocessor directive. Always false when the declared line is unknown.
pub fn matches_near_line(file: &SourceFile, target: &str, declared_line: u32, window: u32) -> bool {
    if declared_line == 0 || target.is_empty() {
        return false;
    }
    let lines = file.lines();
    if lines.is_empty() {
        return false;
    }

    let center = declared_line as usize - 1;
    let window = window as usize;
    let first = center.saturating_sub(window);
    let last = (center + window).min(lines.len() - 1);
    if first > last {
        return false;
    }

    for idx in first..=last {
        if opens_function(&lines, idx, target) {
            debug!(
                "{}: '{}' opens at line {} (declared {})",
                file.path.display(),
                target,
                idx + 1,
                declared_line
            );
            return true;
        }
    }
    false
}

fn is_directive(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn opens_function(lines: &[&str], idx: usize, target: &str) -> bool {
    let line = lines[idx];
    if is_directive(line) {
        return false;
    }

    for end in identifier_ends(line, target) {
        if !is_declaration_prefix(&line[..end - target.len()]) {
            continue;
        }
        let rest = line[end..].trim_start();
        if !rest.starts_with('(') {
            continue;
        }
        let Some((close_idx, tail)) = close_parameter_list(lines, idx, rest) else {
            continue;
        };

        match (tail.find('{'), tail.find(';')) {
            (Some(brace), Some(semi)) if semi < brace => continue,
            (Some(_), _) => return true,
            (None, Some(_)) => continue,
            (None, None) => {}
        }

        let next = lines[close_idx + 1..]
            .iter()
            .find(|candidate| !candidate.trim().is_empty() && !is_directive(candidate));
        if next.is_some_and(|candidate| candidate.trim_start().starts_with('{')) {
            return true;
        }
    }
    false
}

/// Whether the text before a candidate name can only be a return type and
/// storage specifiers (`static char *`, `int`, nothing). Anything else, such
/// as `if (`, `x = ` or `return `, means the name is used inside a body.
fn is_declaration_prefix(prefix: &str) -> bool {
    if !prefix.chars().all(|c| is_ident_char(c) || c.is_whitespace() || c == '*') {
        return false;
    }
    !prefix
        .split(|c: char| !is_ident_char(c))
        .any(|word| STATEMENT_KEYWORDS.contains(&word))
}

/// Balance parentheses starting at `rest` (which begins with `(`) on line
/// `idx`, continuing onto following lines. Returns the line that closes the
/// list and the text after the closing parenthesis.
fn close_parameter_list<'a>(
    lines: &[&'a str],
    idx: usize,
    rest: &'a str,
) -> Option<(usize, &'a str)> {
    let mut depth = 0usize;
    let last = (idx + MAX_SIGNATURE_LINES).min(lines.len() - 1);
    for line_idx in idx..=last {
        let text = if line_idx == idx { rest } else { lines[line_idx] };
        for (offset, c) in text.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some((line_idx, &text[offset + 1..]));
                    }
                }
                _ => {}
            }
        }
    }
    None
}
