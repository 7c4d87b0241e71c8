//! Cross-tabulation of categorical records into labeled count tables.

use ndarray::{ArrayD, IxDyn};

use census_dp_core::{AxisLabels, CountTable, DpError, Result};

/// A record with a categorical value for each named axis.
pub trait Categorical {
    /// Category of this record on `axis`, or `None` when the record has no
    /// such attribute.
    fn category(&self, axis: &str) -> Option<&str>;
}

/// Count records per combination of categories.
///
/// The table has one axis per entry of `axes`, in order, with categories in
/// the order given. Every listed combination gets a cell, so categories with
/// no records show up as explicit zeros. A record whose category is missing
/// from its axis (or whose attribute is absent) is an error rather than a
/// silently dropped row.
pub fn crosstab<R: Categorical>(records: &[R], axes: Vec<AxisLabels>) -> Result<CountTable> {
    if axes.is_empty() {
        return Err(DpError::invalid("crosstab: at least one axis is required"));
    }
    if let Some(axis) = axes.iter().find(|a| a.is_empty()) {
        return Err(DpError::invalid(format!(
            "crosstab: axis {:?} has no categories",
            axis.name
        )));
    }

    let shape: Vec<usize> = axes.iter().map(AxisLabels::len).collect();
    let mut counts = ArrayD::<u64>::zeros(IxDyn(&shape));
    let mut index = vec![0usize; axes.len()];

    for (row, record) in records.iter().enumerate() {
        for (slot, axis) in index.iter_mut().zip(&axes) {
            let value = record.category(&axis.name).ok_or_else(|| {
                DpError::invalid(format!("crosstab: record {row} has no {:?}", axis.name))
            })?;
            *slot = axis.position(value).ok_or_else(|| {
                DpError::invalid(format!(
                    "crosstab: record {row} has unknown {} category {value:?}",
                    axis.name
                ))
            })?;
        }
        counts[IxDyn(&index)] += 1;
    }

    log::trace!("tabulated {} records into {:?}", records.len(), shape);
    CountTable::new(counts).with_labels(axes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct Row(&'static str, &'static str);

    impl Categorical for Row {
        fn category(&self, axis: &str) -> Option<&str> {
            match axis {
                "job" => Some(self.0),
                "sex" => Some(self.1),
                _ => None,
            }
        }
    }

    fn axes() -> Vec<AxisLabels> {
        vec![
            AxisLabels::new("job", ["clerk", "nurse", "pilot"]),
            AxisLabels::new("sex", ["F", "M"]),
        ]
    }

    #[test]
    fn test_counts_and_structural_zeros() {
        let rows = [
            Row("clerk", "F"),
            Row("clerk", "F"),
            Row("nurse", "M"),
            Row("clerk", "M"),
        ];
        let table = crosstab(&rows, axes()).unwrap();
        assert_eq!(table.counts(), &array![[2u64, 1], [0, 1], [0, 0]].into_dyn());
        assert_eq!(table.labels()[0].categories[2], "pilot");
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_unknown_category() {
        let err = crosstab(&[Row("chef", "F")], axes()).unwrap_err();
        assert!(matches!(err, DpError::InvalidParameters { .. }));
    }

    #[test]
    fn test_missing_attribute() {
        let axes = vec![AxisLabels::new("age", ["young"])];
        assert!(crosstab(&[Row("clerk", "F")], axes).is_err());
    }

    #[test]
    fn test_no_records_gives_zero_table() {
        let table = crosstab::<Row>(&[], axes()).unwrap();
        assert_eq!(table.shape(), &[3, 2]);
        assert_eq!(table.total(), 0);
    }
}
