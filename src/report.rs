use crate::aggregation::values::{Numeric, coerce_numeric, get_path, type_name};
use crate::error::{Error, Result};
use bson::{Bson, Document};
use serde::Serialize;

/// A typed row decoded from one aggregation result document.
pub trait ReportRow: Sized + Serialize {
    /// Report name used in decode errors.
    const REPORT: &'static str;

    fn from_document(doc: &Document) -> Result<Self>;
}

/// One author and the number of entries they wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorEntries {
    pub author: Bson,
    pub total_entries: Numeric,
    #[serde(skip)]
    pub raw: Document,
}

/// Summed order amounts for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: String,
    pub total_amount: Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBalance {
    pub year: i32,
    pub month: u32,
    pub income: Numeric,
    pub expense: Numeric,
    pub net: Numeric,
}

impl MonthlyBalance {
    pub fn new(year: i32, month: u32, income: Numeric, expense: Numeric) -> Self {
        Self {
            year,
            month,
            income,
            expense,
            net: income - expense,
        }
    }
}

impl ReportRow for AuthorEntries {
    const REPORT: &'static str = "author-entries";

    fn from_document(doc: &Document) -> Result<Self> {
        // Missing author groups under null, which the server reports as _id: null.
        let author = doc.get("_id").cloned().unwrap_or(Bson::Null);
        Ok(Self {
            author,
            total_entries: numeric_field::<Self>(doc, "total_entries")?,
            raw: doc.clone(),
        })
    }
}

impl ReportRow for DailySales {
    const REPORT: &'static str = "daily-sales";

    fn from_document(doc: &Document) -> Result<Self> {
        let date = match doc.get("_id") {
            Some(Bson::String(s)) => s.clone(),
            Some(other) => return Err(decode_err::<Self>("_id", format!("expected string, got {}", type_name(other)))),
            None => return Err(decode_err::<Self>("_id", "missing")),
        };
        Ok(Self {
            date,
            total_amount: numeric_field::<Self>(doc, "totalAmount")?,
        })
    }
}

impl ReportRow for MonthlyBalance {
    const REPORT: &'static str = "income-expense";

    fn from_document(doc: &Document) -> Result<Self> {
        let year = integral_field::<Self>(doc, "_id.year")?;
        let month = integral_field::<Self>(doc, "_id.month")?;
        let year = i32::try_from(year)
            .map_err(|_| decode_err::<Self>("_id.year", format!("{year} out of range")))?;
        let month = match u32::try_from(month) {
            Ok(m @ 1..=12) => m,
            _ => return Err(decode_err::<Self>("_id.month", format!("{month} is not a month"))),
        };
        Ok(Self::new(
            year,
            month,
            numeric_field::<Self>(doc, "totalIncome")?,
            numeric_field::<Self>(doc, "totalExpense")?,
        ))
    }
}

/// Decode every document, stopping at the first malformed one.
pub fn decode_all<R: ReportRow>(docs: &[Document]) -> Result<Vec<R>> {
    docs.iter().map(R::from_document).collect()
}

fn numeric_field<R: ReportRow>(doc: &Document, path: &str) -> Result<Numeric> {
    match get_path(doc, path) {
        Some(v) => coerce_numeric(v)
            .ok_or_else(|| decode_err::<R>(path, format!("expected number, got {}", type_name(v)))),
        None => Err(decode_err::<R>(path, "missing")),
    }
}

fn integral_field<R: ReportRow>(doc: &Document, path: &str) -> Result<i64> {
    let n = numeric_field::<R>(doc, path)?;
    n.as_i64()
        .ok_or_else(|| decode_err::<R>(path, format!("expected integer, got {n}")))
}

fn decode_err<R: ReportRow>(field: &str, reason: impl Into<String>) -> Error {
    Error::Decode {
        report: R::REPORT,
        field: field.to_string(),
        reason: reason.into(),
    }
}
