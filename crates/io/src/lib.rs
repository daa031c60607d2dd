//! # proxima-io
//!
//! Read point sets and thresholds from JSON files and write match results
//! back out. Bridges files into the `PointSet` / `Threshold` types of
//! `proxima-match`.

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{points_from_rows, read_point_rows, read_points, read_threshold};
pub use writer::{IndexBase, MatchOutput, Summary, to_json, write_matches};
