//! Plain text table rendering.
//!
//! Small hand-rolled renderer: column widths from content, optional
//! centred title, a border above and below.

pub struct TableOpts {
    pub title: String,
    pub padding: usize,
    pub draw_row_border: bool,
}

impl Default for TableOpts {
    fn default() -> Self {
        TableOpts {
            title: String::new(),
            padding: 1,
            draw_row_border: false,
        }
    }
}

/// Render rows of cells into a bordered table.
pub fn to_table(rows: &[Vec<String>], opts: &TableOpts) -> String {
    let mut col_size: Vec<usize> = Vec::new();
    for row in rows {
        for (c, col) in row.iter().enumerate() {
            let width = col.trim().chars().count();
            if c >= col_size.len() {
                col_size.push(width);
            } else if width > col_size[c] {
                col_size[c] = width;
            }
        }
    }
    if col_size.is_empty() {
        return String::new();
    }

    // column data + padding each side, plus spacers and the two sides
    let mut total: usize = col_size.iter().map(|w| w + 2 * opts.padding).sum();
    total += col_size.len() - 1;
    total += 2;

    let border = format!("+{}+\n", "-".repeat(total - 2));
    let mut out = border.clone();

    let title = opts.title.trim();
    if !title.is_empty() {
        let inner = total - 2;
        let left = (inner.saturating_sub(title.chars().count())) / 2;
        let right = inner - left - title.chars().count().min(inner);
        out.push_str(&format!("|{}{}{}|\n", " ".repeat(left), title, " ".repeat(right)));
        out.push_str(&border);
    }

    let pad = " ".repeat(opts.padding);
    for row in rows {
        let mut line = String::from("|");
        for (c, col) in row.iter().enumerate() {
            if c > 0 {
                line.push('|');
            }
            line.push_str(&format!("{}{:<width$}{}", pad, col.trim(), pad, width = col_size[c]));
        }
        line.push_str("|\n");
        out.push_str(&line);
        if opts.draw_row_border {
            out.push_str(&border);
        }
    }
    if !opts.draw_row_border {
        out.push_str(&border);
    }
    out
}
