use crate::cli::output::current_preferences;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::left(header)
        }
    }

    pub fn max(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Plain-text table sized to its widest cell per column.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                column.max_width.map_or(width, |max| width.min(max))
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let mut lines = vec![self.render_row(&header, &widths), horizontal_rule(&widths)];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Character count ignoring ANSI escape sequences.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for code in chars.by_ref() {
                if code.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut result: String = text.chars().filter(|c| *c != '\u{1b}').take(width - 1).collect();
    result.push('…');
    result
}

fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    match alignment {
        Alignment::Left => format!("{fitted}{}", " ".repeat(remaining)),
        Alignment::Right => format!("{}{fitted}", " ".repeat(remaining)),
    }
}

fn horizontal_rule(widths: &[usize]) -> String {
    let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2;
    let ch = if current_preferences().color { '─' } else { '-' };
    ch.to_string().repeat(total)
}

/// Horizontal bar scaled against `max`, for chart-like listings.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if !max.is_finite() || max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_and_truncate() {
        let mut table = Table::new(vec![
            TableColumn::left("Nome").max(6),
            TableColumn::right("Valor"),
        ]);
        table.push(vec!["Beatriz Alves".into(), "R$ 1,00".into()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("Beatr…"));
        assert!(lines[2].ends_with("R$ 1,00"));
    }

    #[test]
    fn ansi_sequences_have_no_width() {
        assert_eq!(visible_width("\u{1b}[32mok\u{1b}[0m"), 2);
    }

    #[test]
    fn bar_is_empty_without_scale() {
        assert_eq!(bar(10.0, 0.0, 20), "");
        assert_eq!(bar(5.0, 10.0, 10).chars().count(), 5);
    }
}
