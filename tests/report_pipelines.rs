use aggreport::config::Config;
use aggreport::runner::{self, ReportKind};
use bson::{DateTime, doc};

fn date(s: &str) -> DateTime {
    DateTime::parse_rfc3339_str(s).unwrap()
}

#[test]
fn author_entries_groups_and_sorts_descending() {
    let cfg = Config::default();
    let docs = ReportKind::AuthorEntries.pipeline(&cfg).to_documents();
    assert_eq!(
        docs,
        vec![
            doc! {"$group": {"_id": "$author", "total_entries": {"$sum": 1}}},
            doc! {"$sort": {"total_entries": -1}},
        ]
    );
    assert_eq!(ReportKind::AuthorEntries.collection(&cfg), "blog_entries");
}

#[test]
fn author_filter_prepends_match() {
    let mut cfg = Config::default();
    cfg.reports.author = Some("John".into());
    let docs = ReportKind::AuthorEntries.pipeline(&cfg).to_documents();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0], doc! {"$match": {"author": "John"}});
}

#[test]
fn daily_sales_covers_configured_day() {
    let cfg = Config::default();
    let docs = ReportKind::DailySales.pipeline(&cfg).to_documents();
    assert_eq!(
        docs,
        vec![
            doc! {"$match": {"orderDate": {
                "$gte": date("2023-09-30T00:00:00Z"),
                "$lte": date("2023-09-30T23:59:59.999Z"),
            }}},
            doc! {"$group": {
                "_id": {"$dateToString": {"format": "%Y-%m-%d", "date": "$orderDate"}},
                "totalAmount": {"$sum": "$totalAmount"},
            }},
            doc! {"$sort": {"_id": 1}},
        ]
    );
    assert_eq!(ReportKind::DailySales.collection(&cfg), "orders");
}

#[test]
fn daily_sales_over_filters_after_grouping() {
    let mut cfg = Config::default();
    cfg.reports.min_daily_total = 250;
    let docs = ReportKind::DailySalesOver.pipeline(&cfg).to_documents();
    assert_eq!(docs.len(), 4);
    assert_eq!(
        docs[0],
        doc! {"$match": {"orderDate": {
            "$gte": date("2023-09-01T00:00:00Z"),
            "$lte": date("2023-09-30T23:59:59.999Z"),
        }}}
    );
    assert!(docs[1].contains_key("$group"));
    assert_eq!(docs[2], doc! {"$match": {"totalAmount": {"$gte": 250i64}}});
    assert_eq!(docs[3], doc! {"$sort": {"_id": 1}});
}

#[test]
fn income_expense_pipeline_shape() {
    let cfg = Config::default();
    let docs = ReportKind::IncomeExpense.pipeline(&cfg).to_documents();
    assert_eq!(
        docs,
        vec![
            doc! {"$addFields": {
                "transactionDate": {"$toDate": "$transactionDate"},
                "isExpense": {"$eq": ["$isIncome", false]},
            }},
            doc! {"$group": {
                "_id": {"year": {"$year": "$transactionDate"}, "month": {"$month": "$transactionDate"}},
                "totalIncome": {"$sum": {"$cond": ["$isIncome", "$amount", 0]}},
                "totalExpense": {"$sum": {"$cond": ["$isExpense", "$amount", 0]}},
            }},
            doc! {"$sort": {"_id.year": 1, "_id.month": 1}},
        ]
    );

    // Sort keys are order sensitive: year before month
    let sort = docs[2].get_document("$sort").unwrap();
    let keys: Vec<&String> = sort.keys().collect();
    assert_eq!(keys, vec!["_id.year", "_id.month"]);
    assert_eq!(ReportKind::IncomeExpense.collection(&cfg), "transactions");
}

#[test]
fn selection_keeps_fixed_order() {
    assert_eq!(runner::select(&[]), ReportKind::ALL.to_vec());
    assert_eq!(
        runner::select(&[
            ReportKind::IncomeExpense,
            ReportKind::AuthorEntries,
            ReportKind::IncomeExpense,
        ]),
        vec![ReportKind::AuthorEntries, ReportKind::IncomeExpense]
    );
}

#[test]
fn explain_prints_pipelines_as_json() {
    let cfg = Config::default();
    let mut out = Vec::new();
    runner::explain(&cfg, &[ReportKind::AuthorEntries], &mut out).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["report"], "author-entries");
    assert_eq!(v["collection"], "blogs.blog_entries");
    assert_eq!(
        v["pipeline"],
        serde_json::json!([
            {"$group": {"_id": "$author", "total_entries": {"$sum": 1}}},
            {"$sort": {"total_entries": -1}},
        ])
    );
}

#[test]
fn explain_renders_dates_as_extended_json() {
    let cfg = Config::default();
    let mut out = Vec::new();
    runner::explain(&cfg, &[ReportKind::DailySales], &mut out).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let gte = &v["pipeline"][0]["$match"]["orderDate"]["$gte"];
    assert_eq!(gte["$date"], "2023-09-30T00:00:00Z");
    let lte = &v["pipeline"][0]["$match"]["orderDate"]["$lte"];
    assert_eq!(lte["$date"], "2023-09-30T23:59:59.999Z");
}
