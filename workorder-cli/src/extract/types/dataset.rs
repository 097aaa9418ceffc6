//! Tabular work order data: named columns over rows of cells

use super::Cell;

/// An ordered set of rows sharing one column list
///
/// Every row holds exactly one cell per column. Rows appended from a sheet
/// with fewer columns are padded with [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Borrowed view of one row with by-name access
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Record<'a> {
    /// Get the cell for a column, or None if the column does not exist
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.cells.get(idx))
    }
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from columns and rows, padding or truncating rows to the column count
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row);
        }
        dataset
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the position of a column by name
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Append a row, aligning it to the current column count
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Append another dataset, matching columns by name
    ///
    /// Columns unknown to `self` are added at the end; existing rows get
    /// [`Cell::Empty`] for them. Rows of `other` get [`Cell::Empty`] for
    /// columns they lack.
    pub fn append(&mut self, other: Dataset) {
        let mapping: Vec<usize> = other
            .columns
            .iter()
            .map(|name| match self.column_index(name) {
                Some(idx) => idx,
                None => {
                    self.columns.push(name.clone());
                    self.columns.len() - 1
                }
            })
            .collect();

        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, Cell::Empty);
        }

        for row in other.rows {
            let mut aligned = vec![Cell::Empty; width];
            for (cell, &target) in row.into_iter().zip(&mapping) {
                aligned[target] = cell;
            }
            self.rows.push(aligned);
        }
    }

    /// Iterate rows as records
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record {
            columns: &self.columns,
            cells,
        })
    }

    /// Mutable access to one column's cells, in row order
    pub fn column_cells_mut(&mut self, column: &str) -> Option<impl Iterator<Item = &mut Cell>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter_mut().filter_map(move |row| row.get_mut(idx)))
    }

    /// Copy of the rows satisfying `predicate`, in original order
    pub fn filter<F>(&self, mut predicate: F) -> Dataset
    where
        F: FnMut(&Record<'_>) -> bool,
    {
        let rows = self
            .records()
            .filter(|record| predicate(record))
            .map(|record| record.cells.to_vec())
            .collect();

        Dataset {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Copy of the dataset restricted to `columns`, in that order
    ///
    /// Names not present in the dataset are skipped.
    pub fn select(&self, columns: &[String]) -> Dataset {
        let picked: Vec<(String, usize)> = columns
            .iter()
            .filter_map(|name| self.column_index(name).map(|idx| (name.clone(), idx)))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| picked.iter().map(|(_, idx)| row[*idx].clone()).collect())
            .collect();

        Dataset {
            columns: picked.into_iter().map(|(name, _)| name).collect(),
            rows,
        }
    }

    /// Keep only the rows for which `keep` returns true
    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Vec<Cell>) -> bool,
    {
        self.rows.retain(keep);
    }
}
