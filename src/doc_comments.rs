//! Leading-comment capture: a `/** ... */` block immediately preceding a
//! declaration becomes that declaration's comment. The indent-stripping
//! logic here is plain string processing, independent of how tokens were
//! produced.

use crate::lexer::{Token, TokenKind};

/// If the token at `token_index - 1` is a doc comment, strip its `/**`/`*/`
/// delimiters and common indentation and return the body. Returns `None` if
/// there is no immediately preceding doc comment, or if its body is empty
/// after trimming.
pub fn leading_comment(tokens: &[Token], token_index: usize) -> Option<String> {
    let prev = token_index.checked_sub(1)?;
    let TokenKind::DocComment(text) = &tokens.get(prev)?.kind else {
        return None;
    };

    let inner = text.get(3..text.len().saturating_sub(2))?;
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(strip_indents(trimmed))
}

/// Strip common indentation from a doc comment body.
///
/// Handles two patterns:
/// 1. Star-prefixed: lines starting with `*` or `**`.
/// 2. Whitespace-indented: strips the common leading whitespace across all
///    lines.
pub fn strip_indents(doc_comment: &str) -> String {
    if let Some(result) = try_strip_star_indent(doc_comment) {
        return result;
    }
    if let Some(result) = try_strip_ws_indent(doc_comment) {
        return result;
    }
    doc_comment.to_string()
}

fn try_strip_star_indent(doc_comment: &str) -> Option<String> {
    let lines: Vec<&str> = doc_comment.lines().collect();
    if lines.len() < 2 {
        return None;
    }

    let first_line = lines[0];
    let star_count = if first_line.starts_with("**") {
        2
    } else if first_line.starts_with('*') {
        1
    } else {
        return None;
    };
    let star_prefix = &"**"[..star_count];

    for line in &lines[1..] {
        let trimmed = line.trim_start();
        if !trimmed.is_empty() && !trimmed.starts_with(star_prefix) {
            return None;
        }
    }

    let mut result_lines = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            let after_stars = &first_line[star_count..];
            let stripped = after_stars.strip_prefix(' ').unwrap_or(after_stars);
            result_lines.push(stripped);
        } else {
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                result_lines.push("");
            } else {
                let after_stars = &trimmed[star_count..];
                let stripped = after_stars.strip_prefix(' ').unwrap_or(after_stars);
                result_lines.push(stripped);
            }
        }
    }

    Some(result_lines.join("\n"))
}

fn try_strip_ws_indent(doc_comment: &str) -> Option<String> {
    let lines: Vec<&str> = doc_comment.lines().collect();
    if lines.len() < 2 {
        return None;
    }

    let mut common_indent: Option<&str> = None;
    for line in &lines[1..] {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        common_indent = Some(match common_indent {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }

    let indent = common_indent.unwrap_or("");
    if indent.is_empty() {
        return None;
    }

    let mut result_lines = vec![lines[0]];
    for line in &lines[1..] {
        if line.len() >= indent.len() {
            result_lines.push(&line[indent.len()..]);
        } else {
            result_lines.push(line);
        }
    }

    Some(result_lines.join("\n"))
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .chars()
        .zip(b.chars())
        .take_while(|(ca, cb)| ca == cb)
        .count();
    &a[..a.chars().take(len).map(|c| c.len_utf8()).sum::<usize>()]
}
