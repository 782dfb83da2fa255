#![forbid(unsafe_code)]

//! Dataset listing formatters
//!
//! Used by `camoco list`. The human formatter prints an aligned table and
//! colors dataset types when the terminal allows it; the JSONL formatter
//! prints one catalog record per line.

use crate::registry::DatasetEntry;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, NoColor, WriteColor};

const HEADERS: [&str; 4] = ["Type", "Name", "Added", "Description"];

/// Human-readable table formatter for catalog entries
pub struct DatasetHumanFormatter;

impl DatasetHumanFormatter {
    pub fn new() -> Self {
        DatasetHumanFormatter
    }

    /// Format entries without color
    pub fn format(&self, entries: &[&DatasetEntry]) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing to a Vec cannot fail
        let _ = self.write(&mut out, entries);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    /// Write the table, coloring the type column
    pub fn write<W: WriteColor>(&self, out: &mut W, entries: &[&DatasetEntry]) -> io::Result<()> {
        if entries.is_empty() {
            writeln!(out, "No datasets found.")?;
            return Ok(());
        }

        let rows: Vec<[String; 4]> = entries
            .iter()
            .map(|e| {
                [
                    e.kind.to_string(),
                    e.name.to_string(),
                    e.added.format("%Y-%m-%d %H:%M").to_string(),
                    e.description.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        out.set_color(ColorSpec::new().set_bold(true))?;
        write_row(out, &HEADERS.map(String::from), &widths)?;
        out.reset()?;

        for row in &rows {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, "{:<width$}", row[0], width = widths[0])?;
            out.reset()?;
            write!(out, "  ")?;
            write_row(out, &[row[1].clone(), row[2].clone(), row[3].clone()], &widths[1..])?;
        }

        writeln!(out)?;
        writeln!(out, "{} dataset(s)", rows.len())?;
        Ok(())
    }
}

impl Default for DatasetHumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            writeln!(out, "{}", cell)?;
        } else {
            write!(out, "{:<width$}  ", cell, width = width)?;
        }
    }
    Ok(())
}

/// JSONL formatter for catalog entries
pub struct DatasetJsonlFormatter;

impl DatasetJsonlFormatter {
    pub fn new() -> Self {
        DatasetJsonlFormatter
    }

    /// Format entries as one JSON object per line
    pub fn format(&self, entries: &[&DatasetEntry]) -> Result<String, serde_json::Error> {
        let mut output = String::new();
        for entry in entries {
            output.push_str(&serde_json::to_string(entry)?);
            output.push('\n');
        }
        Ok(output)
    }
}

impl Default for DatasetJsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}
