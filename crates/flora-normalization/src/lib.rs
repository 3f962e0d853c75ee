//! Value normalization for trait records: positive number parsing, rounding,
//! dimension groups with unit propagation, color values and unit conversion.

pub mod color;
pub mod numeric;
pub mod size;
pub mod units;

pub use color::{collapse_dashes, normalize_color_group, normalize_color_value};
pub use numeric::{format_numeric, number_strings, round3, to_positive_float, to_positive_int};
pub use size::{DimensionGroup, assign_dimensions, clean_sex, propagate_units, size_fields};
pub use units::to_millimeters;
