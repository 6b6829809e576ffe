use crate::cli::output::current_preferences;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::left(header)
        }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// A table with column metadata and rows of cell text.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub show_headers: bool,
    pub padding: usize,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            show_headers: true,
            padding: 1,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width of each column, bounded by the column constraints.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| visible_width(cell))
                    .fold(visible_width(&column.header), usize::max);
                let width = widest.max(column.min_width);
                column.max_width.map_or(width, |max| width.min(max))
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, *width, column.alignment, self.padding)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        if self.show_headers {
            let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
            lines.push(self.render_row(&header, &widths));
            lines.push(horizontal_rule(&widths, self.padding));
        }
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));

        lines.join("\n")
    }
}

/// Splits text into visible characters and zero-width ANSI escape runs.
fn segments(text: &str) -> Vec<(&str, bool)> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        if ch == '\u{1b}' && matches!(chars.peek(), Some((_, '['))) {
            let mut end = text.len();
            chars.next();
            for (idx, next) in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&next) {
                    end = idx + next.len_utf8();
                    break;
                }
            }
            out.push((&text[start..end], false));
        } else {
            out.push((&text[start..start + ch.len_utf8()], true));
        }
    }
    out
}

fn visible_width(text: &str) -> usize {
    segments(text).iter().filter(|(_, visible)| *visible).count()
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut shown = 0;
    let mut styled = false;
    for (segment, visible) in segments(text) {
        if !visible {
            result.push_str(segment);
            styled = true;
        } else if shown + 1 < width {
            result.push_str(segment);
            shown += 1;
        } else {
            break;
        }
    }
    result.push('…');
    if styled {
        result.push_str("\u{1b}[0m");
    }
    result
}

/// Renders a single cell with padding and alignment applied.
pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let fill = " ".repeat(width.saturating_sub(visible_width(&fitted)));
    let pad = " ".repeat(padding);
    match alignment {
        Alignment::Left => format!("{pad}{fitted}{fill}{pad}"),
        Alignment::Right => format!("{pad}{fill}{fitted}{pad}"),
    }
}

/// A horizontal rule spanning the full table width.
pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    let total: usize = widths.iter().map(|w| w + padding * 2).sum::<usize>()
        + widths.len().saturating_sub(1);
    let ch = if current_preferences().plain_mode { '-' } else { '─' };
    ch.to_string().repeat(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_respect_headers_rows_and_limits() {
        let mut table = Table::new(vec![
            TableColumn::left("Category").max_width(6),
            TableColumn::right("Amount"),
        ]);
        table.push_row(vec!["groceries".into(), "1200.00".into()]);
        assert_eq!(table.compute_widths(), vec![6, 7]);
    }

    #[test]
    fn cells_align_and_truncate() {
        assert_eq!(render_cell("AB", 4, Alignment::Left, 1), " AB   ");
        assert_eq!(render_cell("AB", 4, Alignment::Right, 1), "   AB ");
        assert_eq!(render_cell("groceries", 5, Alignment::Left, 0), "groc…");
    }

    #[test]
    fn ansi_sequences_do_not_count_toward_width() {
        assert_eq!(visible_width("\u{1b}[31mred\u{1b}[0m"), 3);
        let cut = truncate_text("\u{1b}[31mcrimson\u{1b}[0m", 4);
        assert!(cut.ends_with("…\u{1b}[0m"));
        assert_eq!(visible_width(&cut), 4);
    }

    #[test]
    fn render_emits_header_rule_and_rows() {
        let mut table = Table::new(vec![TableColumn::left("#"), TableColumn::right("Amount")]);
        table.push_row(vec!["1".into(), "5.00".into()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], " #   Amount");
        assert_eq!(lines[2], " 1     5.00");
    }
}
