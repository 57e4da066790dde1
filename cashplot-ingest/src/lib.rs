//! cashplot-ingest: the source-adapter seam and bank-specific export parsers.

pub mod parsers;
pub mod types;

pub use parsers::ing_csv::{IngCsv, IngTransaction, load_ing_csv, parse_ing_csv};
pub use types::Source;
