//! Markdown primitives: pipe tables and heading-bounded sections.
//!
//! Only what contract documents use is recognised; anything else is
//! treated as plain text.

/// A run of consecutive `|`-prefixed lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Row preceding the first separator row, if any.
    pub header: Option<Vec<String>>,
    /// Non-separator rows other than the header.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Index of the first header cell accepted by `pred`.
    pub fn header_index(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        self.header
            .as_ref()?
            .iter()
            .position(|cell| pred(&plain(cell).to_ascii_lowercase()))
    }
}

/// Split a table line into trimmed cells, dropping the outer pipes.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

/// `|---|:--:|` style rows.
pub fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|c| {
            !c.is_empty() && c.contains('-') && c.chars().all(|ch| matches!(ch, '-' | ':' | ' '))
        })
}

pub fn tables(text: &str) -> Vec<Table> {
    let mut out = Vec::new();
    let mut block: Vec<Vec<String>> = Vec::new();

    for line in text.lines().chain(std::iter::once("")) {
        if line.trim_start().starts_with('|') {
            block.push(split_cells(line));
            continue;
        }
        if !block.is_empty() {
            out.push(build_table(std::mem::take(&mut block)));
        }
    }
    out
}

fn build_table(mut rows: Vec<Vec<String>>) -> Table {
    let header = match rows.iter().position(|r| is_separator_row(r)) {
        Some(sep) if sep >= 1 => Some(rows.remove(sep - 1)),
        _ => None,
    };
    rows.retain(|r| !is_separator_row(r));
    Table { header, rows }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: usize,
    pub title: &'a str,
    /// Zero-based line index.
    pub line: usize,
}

pub fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some((level, rest.trim()))
}

/// Headings outside fenced code blocks.
pub fn headings(text: &str) -> Vec<Heading<'_>> {
    let mut in_fence = false;
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, title)) = heading(line) {
            out.push(Heading {
                level,
                title,
                line: i,
            });
        }
    }
    out
}

/// Bodies (lines after the heading) of every section whose title satisfies
/// `pred`. A section ends at the next heading of the same or higher level.
pub fn sections<'a>(text: &'a str, pred: impl Fn(usize, &str) -> bool) -> Vec<Vec<&'a str>> {
    let lines: Vec<&str> = text.lines().collect();
    let marks = headings(text);
    let mut out = Vec::new();

    for (idx, h) in marks.iter().enumerate() {
        if !pred(h.level, h.title) {
            continue;
        }
        let end = marks[idx + 1..]
            .iter()
            .find(|next| next.level <= h.level)
            .map(|next| next.line)
            .unwrap_or(lines.len());
        out.push(lines[h.line + 1..end].to_vec());
    }
    out
}

/// Strip emphasis markers and inline code ticks.
pub fn plain(cell: &str) -> String {
    cell.trim()
        .trim_matches(|c| c == '*' || c == '`')
        .trim()
        .to_string()
}
