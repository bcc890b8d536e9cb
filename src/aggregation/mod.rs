pub mod pipeline;
pub mod reports;
pub mod values;

pub use pipeline::{Pipeline, Stage};
pub use reports::DateRange;
pub use values::{Numeric, coerce_numeric, get_path};
