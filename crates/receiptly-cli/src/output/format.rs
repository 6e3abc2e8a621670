use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const COLUMN_GAP: &str = "  ";

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Renders a header row plus one line per row, columns padded to the
/// widest cell. Trailing spaces are trimmed.
pub fn render_table(columns: &[Column<'_>], rows: &[Vec<String>], indent: usize) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut widths = columns
        .iter()
        .map(|column| column.name.chars().count())
        .collect::<Vec<usize>>();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, cell.chars().count());
            }
        }
    }

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let padding = " ".repeat(indent);

    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| {
            let cells = columns
                .iter()
                .zip(widths.iter())
                .enumerate()
                .map(|(index, (column, width))| {
                    let value = row.get(index).map(String::as_str).unwrap_or("");
                    match column.align {
                        Align::Left => format!("{value:<width$}"),
                        Align::Right => format!("{value:>width$}"),
                    }
                })
                .collect::<Vec<String>>();
            format!("{padding}{}", cells.join(COLUMN_GAP)).trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Align, Column, key_value_rows, render_table};

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(&[("Id:", "r1".to_string()), ("Sender:", "Uber".to_string())], 2);
        assert_eq!(rows, vec!["  Id:      r1", "  Sender:  Uber"]);
    }

    #[test]
    fn table_pads_to_widest_cell_and_right_aligns_numbers() {
        let columns = [
            Column {
                name: "Sender",
                align: Align::Left,
            },
            Column {
                name: "Total",
                align: Align::Right,
            },
        ];
        let rows = vec![
            vec!["Uber".to_string(), "23.10".to_string()],
            vec!["Hydro One".to_string(), "1,204.00".to_string()],
        ];
        let rendered = render_table(&columns, &rows, 2);
        assert_eq!(
            rendered,
            vec![
                "  Sender        Total",
                "  Uber          23.10",
                "  Hydro One  1,204.00",
            ]
        );
    }
}
