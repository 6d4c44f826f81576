//! Spending reports: category rankings, spending per period and the balance.

mod aggregation;
mod api;
mod charts;
mod page;
mod periods;
mod sequence;

pub use aggregation::{CategorySummary, MAX_SUMMARY_CATEGORIES, summarize_by_category};
pub use api::{
    Balance, balance_endpoint, category_report, category_report_endpoint, spending_report,
    spending_report_endpoint,
};
pub use page::{get_reports_page, get_spending_chart};
pub use periods::{Granularity, PeriodTotal, aggregate_by_period};
pub use sequence::{RequestTicket, ResponseSequencer};
