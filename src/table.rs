//! Columnar participant-level observation table.
//!
//! The reshape/loading collaborator builds one of these from raw survey
//! exports; everything in this crate reads it and never mutates it. Missing
//! values are explicit `None`s, never coerced to zero.

use std::collections::BTreeMap;

use crate::error::StatsError;

/// A fixed-length table of categorical and numeric columns.
///
/// Categorical columns hold group and partition labels; numeric columns hold
/// outcomes and covariates. All columns share the same row count.
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    rows: usize,
    numeric: BTreeMap<String, Vec<Option<f64>>>,
    categorical: BTreeMap<String, Vec<Option<String>>>,
}

impl ObservationTable {
    /// Create an empty table with a fixed row count.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Add a numeric column. Fails if the length does not match the table.
    pub fn add_numeric(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), StatsError> {
        let name = name.into();
        if values.len() != self.rows {
            return Err(StatsError::LengthMismatch {
                name,
                expected: self.rows,
                actual: values.len(),
            });
        }
        self.numeric.insert(name, values);
        Ok(())
    }

    /// Add a categorical column. Fails if the length does not match the table.
    pub fn add_categorical(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<(), StatsError> {
        let name = name.into();
        if values.len() != self.rows {
            return Err(StatsError::LengthMismatch {
                name,
                expected: self.rows,
                actual: values.len(),
            });
        }
        self.categorical.insert(name, values);
        Ok(())
    }

    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>], StatsError> {
        self.numeric
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| StatsError::UnknownColumn(name.to_string()))
    }

    pub fn categorical(&self, name: &str) -> Result<&[Option<String>], StatsError> {
        self.categorical
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| StatsError::UnknownColumn(name.to_string()))
    }

    /// Distinct non-missing labels of a categorical column, in
    /// first-encounter order. The first label of a group column is the
    /// "group1" of every sign convention in this crate.
    pub fn levels(&self, name: &str) -> Result<Vec<String>, StatsError> {
        let col = self.categorical(name)?;
        let mut seen = Vec::new();
        for label in col.iter().flatten() {
            if !seen.iter().any(|s| s == label) {
                seen.push(label.clone());
            }
        }
        Ok(seen)
    }

    /// Present values of `value_col` for rows whose `label_col` equals
    /// `label`. Rows missing either field are dropped.
    pub fn values_where(
        &self,
        label_col: &str,
        label: &str,
        value_col: &str,
    ) -> Result<Vec<f64>, StatsError> {
        let labels = self.categorical(label_col)?;
        let values = self.numeric(value_col)?;
        Ok(labels
            .iter()
            .zip(values.iter())
            .filter(|(l, _)| l.as_deref() == Some(label))
            .filter_map(|(_, v)| *v)
            .collect())
    }

    /// New table containing only the rows where `column` equals `label`.
    pub fn filter_eq(&self, column: &str, label: &str) -> Result<ObservationTable, StatsError> {
        let col = self.categorical(column)?;
        let mask: Vec<bool> = col.iter().map(|l| l.as_deref() == Some(label)).collect();
        let rows = mask.iter().filter(|&&keep| keep).count();

        let mut out = ObservationTable::new(rows);
        for (name, values) in &self.numeric {
            let kept = values
                .iter()
                .zip(mask.iter())
                .filter(|(_, &keep)| keep)
                .map(|(v, _)| *v)
                .collect();
            out.numeric.insert(name.clone(), kept);
        }
        for (name, values) in &self.categorical {
            let kept = values
                .iter()
                .zip(mask.iter())
                .filter(|(_, &keep)| keep)
                .map(|(v, _)| v.clone())
                .collect();
            out.categorical.insert(name.clone(), kept);
        }
        Ok(out)
    }
}
