mod bold;
mod parallel;
mod trim;

pub use bold::BoldGeometryLines;
pub use parallel::{get_parallel_geometry_line_by_distance, get_parallel_geometry_lines_by_distance};
pub use trim::{trim_geometry_lines_offset_result, trim_hatch_geometry_lines};
