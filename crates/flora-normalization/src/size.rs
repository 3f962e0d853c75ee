//! Dimension groups of a size measurement.
//!
//! A size match such as `(12–)23–34 × 45–56 cm` is scanned into one group per
//! cross-delimited segment. Groups then get their units and dimensions filled
//! in before being flattened into `{dimension}_{field}` record fields.

use std::collections::BTreeMap;

use flora_model::{Dimension, FieldValue, RangeKey};

use crate::numeric::round3;

/// One cross-delimited segment of a size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionGroup {
    pub min: Option<f64>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub max: Option<f64>,
    pub units: Option<String>,
    /// Dimension named in the text, or assigned by [`assign_dimensions`].
    pub dimension: Option<Dimension>,
    /// True when the text named the dimension.
    pub named: bool,
    pub sex: Option<String>,
    pub uncertain: bool,
}

impl DimensionGroup {
    pub fn set(&mut self, key: RangeKey, value: f64) {
        let slot = match key {
            RangeKey::Min => &mut self.min,
            RangeKey::Low => &mut self.low,
            RangeKey::High => &mut self.high,
            RangeKey::Max => &mut self.max,
        };
        *slot = Some(value);
    }

    pub fn get(&self, key: RangeKey) -> Option<f64> {
        match key {
            RangeKey::Min => self.min,
            RangeKey::Low => self.low,
            RangeKey::High => self.high,
            RangeKey::Max => self.max,
        }
    }

    pub fn name_dimension(&mut self, dimension: Dimension) {
        self.dimension = Some(dimension);
        self.named = true;
    }

    /// `to 5 mm` style sizes only state an upper bound.
    pub fn low_to_high(&mut self) {
        if let Some(low) = self.low.take() {
            self.high = Some(low);
        }
    }

    pub fn has_values(&self) -> bool {
        self.min.is_some() || self.low.is_some() || self.high.is_some() || self.max.is_some()
    }
}

/// Fills missing units: a group without units takes those of the nearest later
/// group that has them, falling back to the nearest earlier one.
pub fn propagate_units(groups: &mut [DimensionGroup]) {
    for idx in 0..groups.len() {
        if groups[idx].units.is_some() {
            continue;
        }
        let later = groups[idx + 1..].iter().find_map(|g| g.units.clone());
        let found = later.or_else(|| groups[..idx].iter().rev().find_map(|g| g.units.clone()));
        groups[idx].units = found;
    }
}

/// Assigns dimensions to groups that do not name one.
///
/// Two groups are swapped first when the first is named `width` or the second
/// is named `length`. Unnamed groups then take `length`, `width`, `thickness`
/// in order, skipping dimensions already named in the match. With three or
/// more groups no swap happens and named groups keep their position.
pub fn assign_dimensions(groups: &mut [DimensionGroup]) {
    if groups.len() == 2 {
        let first_is_width = groups[0].named && groups[0].dimension == Some(Dimension::Width);
        let second_is_length = groups[1].named && groups[1].dimension == Some(Dimension::Length);
        if first_is_width || second_is_length {
            groups.swap(0, 1);
        }
    }
    let named: Vec<Dimension> = groups
        .iter()
        .filter(|g| g.named)
        .filter_map(|g| g.dimension)
        .collect();
    let mut defaults = Dimension::DEFAULT_ORDER
        .into_iter()
        .filter(|dim| !named.contains(dim));
    for group in groups.iter_mut().filter(|g| !g.named) {
        group.dimension = defaults.next();
    }
}

/// Flattens groups into record fields. Groups left without a dimension are
/// skipped.
pub fn size_fields(groups: &[DimensionGroup]) -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    for group in groups {
        let Some(dimension) = group.dimension else {
            continue;
        };
        for key in [RangeKey::Min, RangeKey::Low, RangeKey::High, RangeKey::Max] {
            if let Some(value) = group.get(key) {
                fields.insert(
                    format!("{dimension}_{key}"),
                    FieldValue::Float(round3(value)),
                );
            }
        }
        if let Some(units) = &group.units {
            fields.insert(
                format!("{dimension}_units"),
                FieldValue::Text(units.to_lowercase()),
            );
        }
        if let Some(sex) = &group.sex {
            fields.insert("sex".to_string(), FieldValue::Text(sex.clone()));
        }
        if group.uncertain {
            fields.insert("uncertain".to_string(), FieldValue::Flag(true));
        }
    }
    fields
}

/// Sex marker text reduced to its word characters, `(pistillate)` -> `pistillate`.
pub fn clean_sex(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}
