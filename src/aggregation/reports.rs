//! The fixed report pipelines.
//!
//! Every pipeline here is evaluated by the server; this module only decides
//! which stages are sent and in what order.

use super::pipeline::{Pipeline, Stage};
use bson::{Bson, DateTime, doc};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

/// Inclusive range of UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    #[serde(deserialize_with = "crate::config::de_date")]
    pub start: NaiveDate,
    #[serde(deserialize_with = "crate::config::de_date")]
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Start of the first day.
    pub fn lower_bound(&self) -> DateTime {
        DateTime::from_millis(self.start.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }

    /// Last millisecond of the final day. BSON dates stop at millisecond precision.
    pub fn upper_bound(&self) -> DateTime {
        let last = self
            .end
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
            + MILLIS_PER_DAY
            - 1;
        DateTime::from_millis(last)
    }
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Entries per author, most prolific first.
pub fn author_entries(author: Option<&str>) -> Pipeline {
    let mut p = Pipeline::new();
    if let Some(author) = author {
        p = p.stage(Stage::Match(doc! {"author": author}));
    }
    p.stage(Stage::Group {
        id: Bson::String("$author".into()),
        accumulators: doc! {"total_entries": {"$sum": 1}},
    })
    .stage(Stage::Sort(doc! {"total_entries": -1}))
}

/// Order totals per calendar day within `range`, oldest day first.
pub fn daily_sales(range: DateRange) -> Pipeline {
    Pipeline::new()
        .stage(order_date_filter(range))
        .stage(group_by_order_day())
        .stage(Stage::Sort(doc! {"_id": 1}))
}

/// Like [`daily_sales`] but drops days whose total is below `min_total`.
pub fn daily_sales_over(range: DateRange, min_total: i64) -> Pipeline {
    Pipeline::new()
        .stage(order_date_filter(range))
        .stage(group_by_order_day())
        .stage(Stage::Match(doc! {"totalAmount": {"$gte": min_total}}))
        .stage(Stage::Sort(doc! {"_id": 1}))
}

/// Income and expense sums per month.
///
/// `transactionDate` may be stored as a string, so it is converted with
/// `$toDate` before extracting year and month.
pub fn income_expense() -> Pipeline {
    Pipeline::new()
        .stage(Stage::AddFields(doc! {
            "transactionDate": {"$toDate": "$transactionDate"},
            "isExpense": {"$eq": ["$isIncome", false]},
        }))
        .stage(Stage::Group {
            id: Bson::Document(doc! {
                "year": {"$year": "$transactionDate"},
                "month": {"$month": "$transactionDate"},
            }),
            accumulators: doc! {
                "totalIncome": {"$sum": {"$cond": ["$isIncome", "$amount", 0]}},
                "totalExpense": {"$sum": {"$cond": ["$isExpense", "$amount", 0]}},
            },
        })
        .stage(Stage::Sort(doc! {"_id.year": 1, "_id.month": 1}))
}

fn order_date_filter(range: DateRange) -> Stage {
    Stage::Match(doc! {
        "orderDate": {
            "$gte": range.lower_bound(),
            "$lte": range.upper_bound(),
        }
    })
}

fn group_by_order_day() -> Stage {
    Stage::Group {
        id: Bson::Document(doc! {
            "$dateToString": {"format": "%Y-%m-%d", "date": "$orderDate"}
        }),
        accumulators: doc! {"totalAmount": {"$sum": "$totalAmount"}},
    }
}
