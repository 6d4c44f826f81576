//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, Error,
    category::{
        create_category_endpoint, create_income_category_endpoint, delete_category_endpoint,
        delete_income_category_endpoint, list_categories_endpoint,
        list_income_categories_endpoint,
    },
    endpoints,
    report::{
        balance_endpoint, category_report_endpoint, get_reports_page, get_spending_chart,
        spending_report_endpoint,
    },
    transaction::{
        create_expense_endpoint, create_income_endpoint, create_transaction_endpoint,
        delete_expense_endpoint, delete_income_endpoint, fetch_expenses_endpoint,
        fetch_income_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::REPORTS_CHART, get(get_spending_chart));

    let transaction_routes = Router::new()
        .route(endpoints::ADD_EXPENSE, post(create_expense_endpoint))
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
        .route(endpoints::FETCH_EXPENSES, get(fetch_expenses_endpoint))
        .route(endpoints::ADD_INCOME, post(create_income_endpoint))
        .route(endpoints::DELETE_INCOME, post(delete_income_endpoint))
        .route(endpoints::FETCH_INCOME, get(fetch_income_endpoint))
        .route(endpoints::ADD_TRANSACTION, post(create_transaction_endpoint));

    let category_routes = Router::new()
        .route(endpoints::ADD_CATEGORY, post(create_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, post(delete_category_endpoint))
        .route(endpoints::FETCH_CATEGORIES, get(list_categories_endpoint))
        .route(
            endpoints::ADD_INCOME_CATEGORY,
            post(create_income_category_endpoint),
        )
        .route(
            endpoints::DELETE_INCOME_CATEGORY,
            post(delete_income_category_endpoint),
        )
        .route(
            endpoints::FETCH_INCOME_CATEGORIES,
            get(list_income_categories_endpoint),
        );

    let report_routes = Router::new()
        .route(endpoints::CATEGORY_REPORT, get(category_report_endpoint))
        .route(endpoints::SPENDING_REPORT, get(spending_report_endpoint))
        .route(endpoints::BALANCE, get(balance_endpoint));

    page_routes
        .merge(transaction_routes)
        .merge(category_routes)
        .merge(report_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the reports page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::REPORTS_VIEW)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod router_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use tower::ServiceExt;

    use crate::{
        build_router, endpoints,
        test_utils::{assert_error_message, get_header, get_test_state, parse_json_body},
    };

    #[tokio::test]
    async fn root_redirects_to_reports() {
        let app = build_router(get_test_state());

        let response = app
            .oneshot(Request::get(endpoints::ROOT).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::REPORTS_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = build_router(get_test_state());

        let response = app
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_error_message(
            response,
            StatusCode::NOT_FOUND,
            "the requested resource could not be found",
        )
        .await;
    }

    #[tokio::test]
    async fn add_then_fetch_expense() {
        let app = build_router(get_test_state());
        let today = time::OffsetDateTime::now_utc().date();
        let body = serde_json::json!({
            "category": "Food",
            "amount": 12.5,
            "date": today.to_string(),
        });

        let response = app
            .clone()
            .oneshot(
                Request::post(endpoints::ADD_EXPENSE)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get(format!("{}?timeFrame=day", endpoints::FETCH_EXPENSES))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body[0]["category"], "Food");
        assert_eq!(body[0]["amount"], 12.5);
    }

    #[tokio::test]
    async fn duplicate_category_through_router_is_bad_request() {
        let app = build_router(get_test_state());
        let request = || {
            Request::post(endpoints::ADD_INCOME_CATEGORY)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"category_name":"Salary"}"#))
                .unwrap()
        };

        let first = app.clone().oneshot(request()).await.unwrap();
        let second = app.oneshot(request()).await.unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_error_message(
            second,
            StatusCode::BAD_REQUEST,
            "Category \"Salary\" already exists",
        )
        .await;
    }

    #[tokio::test]
    async fn serves_page_assets() {
        let app = build_router(get_test_state());

        for path in ["/static/main.css", crate::html::ECHARTS_PATH] {
            let response = app
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "could not get {path}");
        }
    }
}
