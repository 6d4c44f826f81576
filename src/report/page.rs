//! The reports page: balance, spending trend chart and category breakdown.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error, endpoints,
    html::{
        CARD_STYLE, ECHARTS_PATH, HeadElement, PAGE_CONTAINER_STYLE, SELECT_STYLE, base,
        format_currency,
    },
    report::{
        CategorySummary, Granularity, PeriodTotal,
        api::{Balance, ReportState, category_report, get_balance, spending_report},
        charts::{chart_view, spending_chart},
    },
    timeframe::Timeframe,
    timezone::get_local_date,
};

const CATEGORY_BREAKDOWN_ID: &str = "category-breakdown";
const CHART_CONTAINER_ID: &str = "spending-chart";

/// The query string for the reports page.
#[derive(Debug, Default, Deserialize)]
pub struct ReportsPageQuery {
    /// The window for the category breakdown.
    #[serde(rename = "timeFrame", default)]
    pub time_frame: Timeframe,
    /// The period size for the spending chart.
    #[serde(default)]
    pub granularity: Granularity,
}

/// The query string for the spending chart fragment.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// The period size for the spending chart.
    #[serde(default)]
    pub granularity: Granularity,
}

/// Display the reports page.
///
/// HTMX requests only get the category breakdown, which is what the
/// timeframe selector swaps in.
pub async fn get_reports_page(
    State(state): State<ReportState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<ReportsPageQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let categories = category_report(&state.transaction_store, query.time_frame, today);

    if is_htmx_request {
        return Ok(category_breakdown_view(&categories).into_response());
    }

    let periods = spending_report(&state.transaction_store, query.granularity, today);
    let balance = get_balance_or_zero(&state);

    Ok(reports_view(&balance, &periods, &categories, &query).into_response())
}

/// Render the spending chart for the requested granularity.
pub async fn get_spending_chart(
    State(state): State<ReportState>,
    Query(query): Query<ChartQuery>,
) -> Result<Markup, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let periods = spending_report(&state.transaction_store, query.granularity, today);

    Ok(chart_view(&spending_chart(&periods, query.granularity)))
}

fn get_balance_or_zero(state: &ReportState) -> Balance {
    let balance = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| get_balance(&connection));

    balance.unwrap_or_else(|error| {
        tracing::warn!("Could not get balance for reports page: {error}");
        Balance {
            income: 0.0,
            expenses: 0.0,
            balance: 0.0,
        }
    })
}

fn reports_view(
    balance: &Balance,
    periods: &[PeriodTotal],
    categories: &[CategorySummary],
    query: &ReportsPageQuery,
) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Reports" }

            (balance_card(balance))

            section class=(CARD_STYLE)
            {
                div class="flex justify-end mb-2"
                {
                    label for="granularity" class="sr-only" { "Group spending by" }

                    select
                        id="granularity"
                        name="granularity"
                        class=(SELECT_STYLE)
                        hx-get=(endpoints::REPORTS_CHART)
                        hx-target={ "#" (CHART_CONTAINER_ID) }
                        hx-trigger="change"
                        hx-sync="this:replace"
                    {
                        @for (granularity, text) in [
                            (Granularity::Day, "Daily"),
                            (Granularity::Month, "Monthly"),
                            (Granularity::Year, "Yearly"),
                        ] {
                            option
                                value=(granularity.as_query_value())
                                selected[granularity == query.granularity]
                            {
                                (text)
                            }
                        }
                    }
                }

                div id=(CHART_CONTAINER_ID)
                {
                    (chart_view(&spending_chart(periods, query.granularity)))
                }
            }

            section class=(CARD_STYLE)
            {
                div class="flex justify-between items-center mb-4"
                {
                    h2 class="text-xl font-semibold" { "Top categories" }

                    label for="timeFrame" class="sr-only" { "Time frame" }

                    select
                        id="timeFrame"
                        name="timeFrame"
                        class=(SELECT_STYLE)
                        hx-get=(endpoints::REPORTS_VIEW)
                        hx-target={ "#" (CATEGORY_BREAKDOWN_ID) }
                        hx-trigger="change"
                        hx-sync="this:replace"
                    {
                        @for (time_frame, text) in [
                            (Timeframe::Default, "Last 12 months"),
                            (Timeframe::Day, "Last 30 days"),
                            (Timeframe::Month, "This month"),
                            (Timeframe::Year, "Last 5 years"),
                        ] {
                            option
                                value=(time_frame.as_query_value())
                                selected[time_frame == query.time_frame]
                            {
                                (text)
                            }
                        }
                    }
                }

                div id=(CATEGORY_BREAKDOWN_ID)
                {
                    (category_breakdown_view(categories))
                }
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_PATH.to_owned())];

    base("Reports", &scripts, &content)
}

fn balance_card(balance: &Balance) -> Markup {
    let balance_style = if balance.balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html!(
        section id="balance" class=(CARD_STYLE)
        {
            dl class="grid grid-cols-3 gap-4 text-center"
            {
                div
                {
                    dt class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                    dd class="text-lg font-semibold" { (format_currency(balance.income)) }
                }

                div
                {
                    dt class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                    dd class="text-lg font-semibold" { (format_currency(balance.expenses)) }
                }

                div
                {
                    dt class="text-sm text-gray-500 dark:text-gray-400" { "Balance" }
                    dd class={ "text-lg font-semibold " (balance_style) }
                    {
                        (format_currency(balance.balance))
                    }
                }
            }
        }
    )
}

fn category_breakdown_view(categories: &[CategorySummary]) -> Markup {
    html!(
        @if categories.is_empty() {
            p class="text-gray-500 dark:text-gray-400" { "No expenses in this period." }
        } @else {
            ul class="space-y-4"
            {
                @for summary in categories {
                    li data-category=(summary.category)
                    {
                        div class="flex justify-between mb-1"
                        {
                            span class="font-medium" { (summary.category) }
                            span { (format_currency(summary.total)) }
                        }

                        div class="w-full h-2 rounded bg-gray-200 dark:bg-gray-700"
                        {
                            div
                                class="h-2 rounded bg-blue-600"
                                style=(format!("width: {:.1}%", summary.ratio * 100.0))
                            {}
                        }

                        div class="flex justify-between mt-1 text-xs text-gray-500 dark:text-gray-400"
                        {
                            span { (format!("{:.1}% of highest", summary.ratio * 100.0)) }
                            span
                            {
                                (summary.count)
                                @if summary.count == 1 { " expense" } @else { " expenses" }
                            }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_htmx::HxRequest;
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime};

    use crate::{
        AppState,
        html::format_currency,
        report::{
            Granularity,
            api::ReportState,
            page::{ChartQuery, ReportsPageQuery, get_reports_page, get_spending_chart},
        },
        test_utils::{
            assert_content_type, assert_valid_html, get_test_state, parse_html_document,
            parse_html_fragment,
        },
        timeframe::Timeframe,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    fn get_state(app_state: &AppState) -> ReportState {
        ReportState {
            transaction_store: app_state.transaction_store(),
            db_connection: app_state.db_connection.clone(),
            local_timezone: app_state.local_timezone.clone(),
        }
    }

    fn insert(app_state: &AppState, kind: TransactionKind, category: &str, amount: f64) {
        let today = OffsetDateTime::now_utc().date();
        create_transaction(
            Transaction::build(kind, amount, today - Duration::days(2), category),
            &app_state.db_connection.lock().unwrap(),
        )
        .expect("Could not create transaction");
    }

    fn select_text(html: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn page_shows_balance_chart_and_categories() {
        let app_state = get_test_state();
        insert(&app_state, TransactionKind::Income, "Salary", 1000.0);
        insert(&app_state, TransactionKind::Expense, "Rent", 400.0);
        insert(&app_state, TransactionKind::Expense, "Food", 100.0);
        insert(&app_state, TransactionKind::Expense, "Food", 100.0);

        let response = get_reports_page(
            State(get_state(&app_state)),
            HxRequest(false),
            Query(ReportsPageQuery::default()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(
            select_text(&html, "#balance dd"),
            vec![
                format_currency(1000.0),
                format_currency(600.0),
                format_currency(400.0)
            ]
        );
        assert_eq!(
            select_text(&html, "#spending-chart-canvas").len(),
            1,
            "chart container missing"
        );
        assert_eq!(
            select_text(&html, "#category-breakdown li span.font-medium"),
            vec!["Rent", "Food"]
        );
        let counts = select_text(&html, "#category-breakdown li");
        assert!(counts[1].contains("2 expenses"), "{counts:?}");
        assert!(counts[1].contains("50.0% of highest"), "{counts:?}");
    }

    #[tokio::test]
    async fn selectors_replace_superseded_requests() {
        let app_state = get_test_state();

        let response = get_reports_page(
            State(get_state(&app_state)),
            HxRequest(false),
            Query(ReportsPageQuery::default()),
        )
        .await
        .into_response();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("select[hx-get]").unwrap();
        let selects: Vec<_> = html.select(&selector).collect();
        assert_eq!(selects.len(), 2);
        for select in selects {
            assert_eq!(select.value().attr("hx-sync"), Some("this:replace"));
        }
    }

    #[tokio::test]
    async fn htmx_request_returns_only_breakdown() {
        let app_state = get_test_state();
        insert(&app_state, TransactionKind::Expense, "Food", 10.0);

        let response = get_reports_page(
            State(get_state(&app_state)),
            HxRequest(true),
            Query(ReportsPageQuery {
                time_frame: Timeframe::Day,
                granularity: Granularity::Month,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(select_text(&html, "title").is_empty());
        assert_eq!(select_text(&html, "li span.font-medium"), vec!["Food"]);
        assert!(select_text(&html, "li")[0].contains("1 expense"));
    }

    #[tokio::test]
    async fn empty_breakdown_shows_message() {
        let app_state = get_test_state();

        let response = get_reports_page(
            State(get_state(&app_state)),
            HxRequest(true),
            Query(ReportsPageQuery::default()),
        )
        .await
        .into_response();

        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, "p"), vec!["No expenses in this period."]);
    }

    #[tokio::test]
    async fn chart_fragment_uses_granularity() {
        let app_state = get_test_state();

        let response = get_spending_chart(
            State(get_state(&app_state)),
            Query(ChartQuery {
                granularity: Granularity::Year,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let script = select_text(&html, "script").join("");
        assert!(script.contains("Last five years"), "{script}");
    }
}
