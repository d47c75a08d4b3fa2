// Library exports for hitmatrix
pub mod error;
pub mod hit_matrix;
pub mod hit_record;
pub mod hit_table;
pub mod pipeline;
pub mod query_name;
pub mod scanner;
pub mod section;
pub mod target_name;

pub use error::{HitError, Result};
pub use hit_matrix::{HitMatrix, MatrixBuild, MatrixSummary, MatrixTable};
pub use hit_record::{parse_hit_section, parse_pretty_content, parse_pretty_file, HitRecord};
pub use hit_table::TableFormat;
pub use pipeline::{collect_hits, CollectOptions, RunReport};
