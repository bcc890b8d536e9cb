use crate::aggregation::reports::{self, DateRange};
use crate::aggregation::Pipeline;
use crate::config::Config;
use crate::error::Result;
use crate::render::{OutputFormat, Render, write_rows};
use crate::report::{AuthorEntries, DailySales, MonthlyBalance, ReportRow, decode_all};
use crate::source::AggregateSource;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum ReportKind {
    /// Entries per blog author
    AuthorEntries,
    /// Order totals for the configured sales day
    DailySales,
    /// Order totals per day over the configured range, above the minimum
    DailySalesOver,
    /// Monthly income, expense and net balance
    IncomeExpense,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::AuthorEntries,
        ReportKind::DailySales,
        ReportKind::DailySalesOver,
        ReportKind::IncomeExpense,
    ];

    /// Stable name used on the command line and in JSON output.
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::AuthorEntries => "author-entries",
            ReportKind::DailySales => "daily-sales",
            ReportKind::DailySalesOver => "daily-sales-over",
            ReportKind::IncomeExpense => "income-expense",
        }
    }

    /// Section header printed before the rows in text output.
    pub fn header(self) -> &'static str {
        match self {
            ReportKind::AuthorEntries => "MatchGroupSort:",
            ReportKind::DailySales => "MatchGroupSortAdvance:",
            ReportKind::DailySalesOver => "MatchGroupGroupSort:",
            ReportKind::IncomeExpense => "IncomeExpense:",
        }
    }

    pub fn collection(self, cfg: &Config) -> &str {
        match self {
            ReportKind::AuthorEntries => &cfg.collections.blog_entries,
            ReportKind::DailySales | ReportKind::DailySalesOver => &cfg.collections.orders,
            ReportKind::IncomeExpense => &cfg.collections.transactions,
        }
    }

    pub fn pipeline(self, cfg: &Config) -> Pipeline {
        let r = &cfg.reports;
        match self {
            ReportKind::AuthorEntries => reports::author_entries(r.author.as_deref()),
            ReportKind::DailySales => reports::daily_sales(DateRange::day(r.sales_day)),
            ReportKind::DailySalesOver => reports::daily_sales_over(r.sales_range, r.min_daily_total),
            ReportKind::IncomeExpense => reports::income_expense(),
        }
    }
}

/// Normalise a user selection: empty means every report, duplicates collapse,
/// and the fixed report order is kept regardless of how they were given.
pub fn select(requested: &[ReportKind]) -> Vec<ReportKind> {
    if requested.is_empty() {
        return ReportKind::ALL.to_vec();
    }
    let mut kinds = requested.to_vec();
    kinds.sort();
    kinds.dedup();
    kinds
}

/// Run the selected reports one after another, writing each section to `out`.
///
/// The first failing report aborts the run.
pub async fn run_reports<S, W>(
    source: &S,
    cfg: &Config,
    kinds: &[ReportKind],
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    S: AggregateSource,
    W: Write,
{
    for &kind in kinds {
        match kind {
            ReportKind::AuthorEntries => run_one::<AuthorEntries, _, _>(source, cfg, kind, format, out).await?,
            ReportKind::DailySales | ReportKind::DailySalesOver => {
                run_one::<DailySales, _, _>(source, cfg, kind, format, out).await?
            }
            ReportKind::IncomeExpense => run_one::<MonthlyBalance, _, _>(source, cfg, kind, format, out).await?,
        }
    }
    Ok(())
}

async fn run_one<R, S, W>(
    source: &S,
    cfg: &Config,
    kind: ReportKind,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    R: ReportRow + Render,
    S: AggregateSource,
    W: Write,
{
    let collection = kind.collection(cfg);
    let pipeline = kind.pipeline(cfg);
    tracing::info!(report = kind.name(), collection, stages = pipeline.len(), "running report");

    if format == OutputFormat::Text {
        writeln!(out, "{}", kind.header())?;
    }
    let docs = source.aggregate(collection, pipeline.to_documents()).await?;
    let rows = decode_all::<R>(&docs)?;
    write_rows(&rows, kind.name(), format, out)?;
    out.flush()?;
    tracing::info!(report = kind.name(), rows = rows.len(), "report done");
    Ok(())
}

/// Print the pipelines that would be sent, without contacting the server.
pub fn explain<W: Write>(cfg: &Config, kinds: &[ReportKind], out: &mut W) -> Result<()> {
    for &kind in kinds {
        let entry = serde_json::json!({
            "report": kind.name(),
            "collection": format!("{}.{}", cfg.database, kind.collection(cfg)),
            "pipeline": kind.pipeline(cfg).to_json(),
        });
        serde_json::to_writer_pretty(&mut *out, &entry)?;
        writeln!(out)?;
    }
    Ok(())
}
