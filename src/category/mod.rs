//! Named categories for expenses and income.

mod create;
mod db;
mod delete;
mod domain;
mod list;

pub use create::{create_category_endpoint, create_income_category_endpoint};
pub use db::create_category_tables;
pub use delete::{delete_category_endpoint, delete_income_category_endpoint};
pub use domain::{
    Category, CategoryForm, CategoryId, CategoryKind, CategoryName, DeleteCategoryForm,
};
pub use list::{list_categories_endpoint, list_income_categories_endpoint};
