//! Template rendering with `$name$` substitution
//!
//! Templates are written as indented raw strings inside the generator. The
//! printer strips their common indentation, then substitutes variables:
//!
//! - A line holding nothing but `$name$` is replaced by the value, every line
//!   of it indented to the line's indentation. A blank value removes the line.
//! - Any other `$name$` is replaced inline. Continuation lines of a
//!   multi-line value are indented to the indentation of the line holding
//!   the variable.
//! - `$$` is a literal `$`.
//!
//! Runs of blank lines collapse to one, and leading and trailing blank lines
//! are dropped, so optional sections can be left empty without leaving gaps.

use crate::error::{CodegenError, CodegenResult};

/// Render `template` with `vars`.
///
/// When a name appears more than once in `vars`, the last binding wins.
/// Referencing an unbound name is a [`CodegenError::Template`].
pub fn render(template: &str, vars: &[(&str, &str)]) -> CodegenResult<String> {
    let lines: Vec<&str> = template.lines().collect();
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Ok(String::new());
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(start);
    let body = &lines[start..=end];

    let strip = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indentation(l).len())
        .min()
        .unwrap_or(0);

    let mut out = Vec::new();
    for (offset, raw) in body.iter().enumerate() {
        if raw.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        let line = &raw[strip..];
        let indent = indentation(line);
        let line_no = start + offset + 1;

        if let Some(name) = standalone_variable(line) {
            let value = lookup(vars, name, line_no)?;
            if !value.trim().is_empty() {
                for value_line in value.trim_end().lines() {
                    out.push(indent_line(indent, value_line));
                }
            }
            continue;
        }

        let substituted = substitute(line, indent, vars, line_no)?;
        out.extend(substituted.lines().map(str::to_string));
    }

    Ok(finish(out))
}

fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn indent_line(indent: &str, line: &str) -> String {
    if line.trim().is_empty() {
        String::new()
    } else {
        format!("{indent}{line}")
    }
}

fn standalone_variable(line: &str) -> Option<&str> {
    let name = line.trim().strip_prefix('$')?.strip_suffix('$')?;
    (!name.is_empty() && !name.contains('$')).then_some(name)
}

fn lookup<'v>(vars: &[(&str, &'v str)], name: &str, line_no: usize) -> CodegenResult<&'v str> {
    vars.iter()
        .rev()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| {
            CodegenError::Template(format!("unbound variable `${name}$` on line {line_no}"))
        })
}

fn substitute(
    line: &str,
    indent: &str,
    vars: &[(&str, &str)],
    line_no: usize,
) -> CodegenResult<String> {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('$') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('$') else {
            return Err(CodegenError::Template(format!(
                "unterminated variable on line {line_no}: `{}`",
                line.trim()
            )));
        };
        let name = &after[..close];
        if name.is_empty() {
            result.push('$');
        } else {
            let value = lookup(vars, name, line_no)?;
            let mut value_lines = value.trim_end_matches('\n').split('\n');
            if let Some(first) = value_lines.next() {
                result.push_str(first);
            }
            for continuation in value_lines {
                result.push('\n');
                result.push_str(&indent_line(indent, continuation));
            }
        }
        rest = &after[close + 1..];
    }
    result.push_str(rest);
    Ok(result)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = String::new();
    let mut pending_blank = false;
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
