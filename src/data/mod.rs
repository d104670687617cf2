//! Data module - loading, preprocessing and filtering of the CSV extracts

mod columns;
mod filter;
mod loader;
mod preprocess;

pub use columns::{date_values, distinct_strings, f64_values, str_values};
pub use filter::{
    expand_category_selection, filter_brand, filter_by_period, filter_categories, filter_sales,
    observed_months, observed_years, MONTH_ABBREV, SELECT_ALL,
};
pub use loader::{AnalyticsTables, LoaderError};
pub use preprocess::{derive_date_parts, fill_missing_medium, PreprocessError};
