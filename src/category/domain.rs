//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed. Case is preserved, so
    /// "Food" and "food" are different names.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// Which kind of transaction a category is offered for.
///
/// Expense and income categories live in separate tables, so the same name
/// may exist once for each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Categories for expenses, e.g. "Food".
    Expense,
    /// Categories for income, e.g. "Salary".
    Income,
}

impl CategoryKind {
    /// The name of the table that stores categories of this kind.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Expense => "categories",
            Self::Income => "income_category",
        }
    }
}

/// A named category that transactions can be recorded under.
///
/// Transactions store the category name as plain text, so deleting or
/// renaming a category does not change existing transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique name of the category.
    pub category_name: CategoryName,
}

/// JSON body for creating a category.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The name of the new category.
    pub category_name: Option<String>,
}

/// JSON body for deleting a category.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteCategoryForm {
    /// The ID of the category to delete.
    pub id: Option<CategoryId>,
}
