pub mod output;

pub use output::{render_csv, render_json, render_table};
