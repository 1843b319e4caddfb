// src/table/mod.rs
pub mod load;
pub mod utils;

pub use load::load_table;
pub use utils::{column, numeric_values, replace_column, sales_columns, string_values};

pub const PRODUCT_ID: &str = "product_id";
pub const PRODUCT_NAME: &str = "product_name";
pub const CATEGORY: &str = "category";
pub const PRICE: &str = "price";
pub const REVIEW_SCORE: &str = "review_score";
pub const REVIEW_COUNT: &str = "review_count";

/// Any column whose name contains this is a monthly sales column.
pub const SALES_MONTH: &str = "sales_month";

/// Columns the pipeline addresses by name.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    PRODUCT_ID,
    PRODUCT_NAME,
    CATEGORY,
    PRICE,
    REVIEW_SCORE,
    REVIEW_COUNT,
];
