use std::io::{IsTerminal, Write};

use agenda_shared::ListItem;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    json: bool,
}

impl Renderer {
    pub fn new(color: bool, json: bool) -> Self {
        Self {
            color: color && std::io::stdout().is_terminal(),
            json,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn json<W: Write, T: Serialize>(&self, out: &mut W, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn field<W: Write>(&self, out: &mut W, name: &str, value: &str) -> anyhow::Result<()> {
        writeln!(out, "{:<9} {}", name, value)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, out, items, visible))]
    pub fn print_listing<W: Write>(
        &self,
        out: &mut W,
        items: &[ListItem],
        visible: &[bool],
    ) -> anyhow::Result<()> {
        let rows: Vec<ListingRow<'_>> = items
            .iter()
            .zip(visible)
            .map(|(item, shown)| ListingRow {
                id: item.id.as_deref().unwrap_or("-"),
                date: &item.date,
                kind: &item.kind,
                shown: *shown,
            })
            .collect();

        self.write_listing(out, &rows)
    }

    pub fn notice<W: Write>(&self, out: &mut W, text: &str) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(text, "31"))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

const LISTING_HEADERS: [&str; 4] = ["ID", "Date", "Type", "Shown"];

/// One event line of the listing table.
struct ListingRow<'a> {
    id: &'a str,
    date: &'a str,
    kind: &'a str,
    shown: bool,
}

impl ListingRow<'_> {
    fn cells(&self) -> [&str; 4] {
        let shown = if self.shown { "yes" } else { "no" };
        [self.id, self.date, self.kind, shown]
    }

    /// ANSI color for a cell, if any.
    fn color(&self, column: usize) -> Option<&'static str> {
        match column {
            0 => Some("33"),
            3 if self.shown => Some("32"),
            3 => Some("2"),
            _ => None,
        }
    }
}

impl Renderer {
    /// Widths come from the plain cell text; color is only added while
    /// writing, after the padding is known.
    fn write_listing<W: Write>(&self, out: &mut W, rows: &[ListingRow<'_>]) -> anyhow::Result<()> {
        let mut widths = LISTING_HEADERS.map(UnicodeWidthStr::width);
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(UnicodeWidthStr::width(cell));
            }
        }

        for (header, width) in LISTING_HEADERS.iter().zip(widths) {
            write!(out, "{header:width$} ")?;
        }
        writeln!(out)?;

        for width in widths {
            write!(out, "{:-<width$} ", "")?;
        }
        writeln!(out)?;

        for row in rows {
            for (column, (cell, width)) in row.cells().into_iter().zip(widths).enumerate() {
                let padding = " ".repeat(width.saturating_sub(UnicodeWidthStr::width(cell)));
                let cell = match row.color(column) {
                    Some(code) => self.paint(cell, code),
                    None => cell.to_string(),
                };
                write!(out, "{cell}{padding} ")?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}
