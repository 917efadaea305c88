//! Unified line diffs between previous and current snapshot content.
//!
//! Built on the `diff` crate, grouped into hunks with a configurable amount
//! of surrounding context. The output is labeled `Previous` / `Current`
//! rather than with file names, since both sides live in memory. Lines keep
//! their `\n` terminator while diffing, so a fixture whose only difference is
//! a missing final newline still produces a visible diff, with the
//! conventional `\ No newline at end of file` marker.

use std::fmt::Write;

/// A diff line annotated with its position on each side.
struct Numbered<'a> {
    edit: diff::Result<&'a str>,
    old_line: Option<usize>,
    new_line: Option<usize>,
}

/// One contiguous run of diff lines, as an index range into the edit list.
struct Hunk {
    start: usize,
    end: usize,
}

/// Produces a unified diff of `previous` against `current` with `context`
/// lines around each change. Equal inputs produce the empty string; unequal
/// inputs always produce at least one changed line.
pub fn unified_diff(previous: &str, current: &str, context: usize) -> String {
    let previous_lines = split_lines(previous);
    let current_lines = split_lines(current);

    let edits = diff::slice(&previous_lines, &current_lines)
        .into_iter()
        .map(flatten_edit)
        .collect();
    let numbered = number_edits(edits);
    let hunks = collect_hunks(&numbered, context);
    if hunks.is_empty() {
        return String::new();
    }

    let mut out = String::from("--- Previous\n+++ Current\n");
    for hunk in hunks {
        write_hunk(&mut out, &numbered, &hunk);
    }
    out
}

/// Splits content into lines that keep their `\n` terminator, so a missing
/// final newline is visible to the comparison.
fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

fn flatten_edit<'a>(edit: diff::Result<&&'a str>) -> diff::Result<&'a str> {
    match edit {
        diff::Result::Left(line) => diff::Result::Left(*line),
        diff::Result::Right(line) => diff::Result::Right(*line),
        diff::Result::Both(left, right) => diff::Result::Both(*left, *right),
    }
}

/// Assigns 1-based line numbers to each edit: removals and unchanged lines
/// consume a line on the old side, additions and unchanged lines on the new.
fn number_edits<'a>(edits: Vec<diff::Result<&'a str>>) -> Vec<Numbered<'a>> {
    let mut old_line = 0usize;
    let mut new_line = 0usize;
    edits
        .into_iter()
        .map(|edit| {
            let (old, new) = match edit {
                diff::Result::Left(_) => {
                    old_line += 1;
                    (Some(old_line), None)
                }
                diff::Result::Right(_) => {
                    new_line += 1;
                    (None, Some(new_line))
                }
                diff::Result::Both(_, _) => {
                    old_line += 1;
                    new_line += 1;
                    (Some(old_line), Some(new_line))
                }
            };
            Numbered {
                edit,
                old_line: old,
                new_line: new,
            }
        })
        .collect()
}

/// Groups changed lines into hunks. Two changes share a hunk when the run of
/// unchanged lines between them fits inside twice the context width; each
/// hunk then absorbs up to `context` unchanged lines on either side.
fn collect_hunks(numbered: &[Numbered<'_>], context: usize) -> Vec<Hunk> {
    let changed: Vec<usize> = numbered
        .iter()
        .enumerate()
        .filter(|(_, n)| !matches!(n.edit, diff::Result::Both(_, _)))
        .map(|(i, _)| i)
        .collect();

    let mut hunks: Vec<Hunk> = Vec::new();
    for index in changed {
        let start = index.saturating_sub(context);
        let end = (index + context).min(numbered.len() - 1);
        match hunks.last_mut() {
            Some(last) if start <= last.end + 1 => last.end = end,
            _ => hunks.push(Hunk { start, end }),
        }
    }
    hunks
}

fn write_hunk(out: &mut String, numbered: &[Numbered<'_>], hunk: &Hunk) {
    let slice = &numbered[hunk.start..=hunk.end];

    let old_count = slice.iter().filter(|n| n.old_line.is_some()).count();
    let new_count = slice.iter().filter(|n| n.new_line.is_some()).count();
    // A side with no lines in the hunk anchors to the last line before it.
    let old_start = slice
        .iter()
        .find_map(|n| n.old_line)
        .unwrap_or_else(|| last_line_before(numbered, hunk.start, |n| n.old_line));
    let new_start = slice
        .iter()
        .find_map(|n| n.new_line)
        .unwrap_or_else(|| last_line_before(numbered, hunk.start, |n| n.new_line));

    let _ = writeln!(out, "@@ -{old_start},{old_count} +{new_start},{new_count} @@");
    for n in slice {
        let (sign, text) = match &n.edit {
            diff::Result::Left(line) => ('-', *line),
            diff::Result::Right(line) => ('+', *line),
            diff::Result::Both(line, _) => (' ', *line),
        };
        let _ = write!(out, "{sign}{text}");
        // Only the last line of either side can lack a terminator.
        if !text.ends_with('\n') {
            out.push_str("\n\\ No newline at end of file\n");
        }
    }
}

fn last_line_before(
    numbered: &[Numbered<'_>],
    start: usize,
    side: impl Fn(&Numbered<'_>) -> Option<usize>,
) -> usize {
    numbered[..start].iter().rev().find_map(side).unwrap_or(0)
}
