use crate::error::Result;
use crate::report::{AuthorEntries, DailySales, MonthlyBalance, ReportRow};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines, one section per report
    #[default]
    Text,
    /// One JSON object per row, tagged with the report name
    Json,
}

/// Plain text rendering of a report row.
pub trait Render {
    fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

impl Render for AuthorEntries {
    fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.raw)
    }
}

impl Render for DailySales {
    fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Tanggal: {}, Total Penjualan: {}", self.date, self.total_amount)
    }
}

impl Render for MonthlyBalance {
    fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Laporan Keuangan Bulan {}-{:02}", self.year, self.month)?;
        writeln!(out, "Total Pendapatan: {}", self.income)?;
        writeln!(out, "Total Pengeluaran: {}", self.expense)?;
        writeln!(out, "Saldo Bersih: {}", self.net)?;
        writeln!(out, "{}", "-".repeat(29))
    }
}

/// Write `rows` in the requested format. JSON lines carry `label` under `report`.
pub fn write_rows<R, W>(rows: &[R], label: &str, format: OutputFormat, out: &mut W) -> Result<()>
where
    R: ReportRow + Render,
    W: Write,
{
    for row in rows {
        match format {
            OutputFormat::Text => row.write_text(out)?,
            OutputFormat::Json => {
                let mut value = serde_json::to_value(row)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("report".into(), label.into());
                }
                serde_json::to_writer(&mut *out, &value)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
