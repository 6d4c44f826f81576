//! The API endpoints URIs.

/// The root route which redirects to the reports page.
pub const ROOT: &str = "/";
/// The page showing spending trends and the category breakdown.
pub const REPORTS_VIEW: &str = "/reports";
/// The spending chart fragment swapped in when the granularity changes.
pub const REPORTS_CHART: &str = "/reports/chart";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to record an expense.
pub const ADD_EXPENSE: &str = "/api/expense/add";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/api/expense/delete";
/// The route to list expenses in a time window.
pub const FETCH_EXPENSES: &str = "/api/expense/fetch";
/// The route to record income.
pub const ADD_INCOME: &str = "/api/income/add";
/// The route to delete income.
pub const DELETE_INCOME: &str = "/api/income/delete";
/// The route to list income in a time window.
pub const FETCH_INCOME: &str = "/api/income/fetch";
/// The route to record either kind of transaction, selected by its `type` field.
pub const ADD_TRANSACTION: &str = "/api/transaction/add";

/// The route to create an expense category.
pub const ADD_CATEGORY: &str = "/api/category/add";
/// The route to delete an expense category.
pub const DELETE_CATEGORY: &str = "/api/category/delete";
/// The route to list expense categories.
pub const FETCH_CATEGORIES: &str = "/api/category/fetch";
/// The route to create an income category.
pub const ADD_INCOME_CATEGORY: &str = "/api/income-category/add";
/// The route to delete an income category.
pub const DELETE_INCOME_CATEGORY: &str = "/api/income-category/delete";
/// The route to list income categories.
pub const FETCH_INCOME_CATEGORIES: &str = "/api/income-category/fetch";

/// The route for the ranked spending-by-category report.
pub const CATEGORY_REPORT: &str = "/api/reports/categories";
/// The route for spending totals bucketed by day, month or year.
pub const SPENDING_REPORT: &str = "/api/reports/spending";
/// The route for total income, total expenses and the difference.
pub const BALANCE: &str = "/api/balance";
