use crate::error::FrameError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named column of optional string cells. `None` is a missing value.
///
/// Cell storage is shared, so cloning a column or a table never copies cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Arc<Vec<Option<String>>>,
}

impl Column {
    pub fn new<S: Into<String>>(name: S, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: Arc::new(values),
        }
    }

    /// A column with no missing values.
    pub fn from_values<S, I, V>(name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(name, values.into_iter().map(|v| Some(v.into())).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.values.get(row).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// An ordered set of equally long columns.
///
/// Tables are values: [`Table::with_column`] returns a new table and leaves
/// the one it was called on untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, FrameError> {
        let mut table = Self::default();
        for column in columns {
            if table.position(column.name()).is_some() {
                return Err(FrameError::configuration(format!(
                    "duplicate column name {:?}",
                    column.name()
                )));
            }
            table.check_length(&column)?;
            table.columns.push(column);
        }
        Ok(table)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column, FrameError> {
        self.position(name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    /// Returns a copy of this table with `column` added, or replacing the
    /// existing column of the same name in place.
    pub fn with_column(&self, column: Column) -> Result<Table, FrameError> {
        self.check_length(&column)?;
        let mut table = self.clone();
        match table.position(column.name()) {
            Some(i) => table.columns[i] = column,
            None => table.columns.push(column),
        }
        Ok(table)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    fn check_length(&self, column: &Column) -> Result<(), FrameError> {
        if self.columns.is_empty() || column.len() == self.height() {
            return Ok(());
        }
        Err(FrameError::LengthMismatch {
            name: column.name().to_string(),
            expected: self.height(),
            found: column.len(),
        })
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NULL: &str = "null";
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| {
                c.values()
                    .iter()
                    .map(|v| v.as_deref().unwrap_or(NULL).chars().count())
                    .chain(std::iter::once(c.name().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c.name(), w = *w))
            .collect();
        writeln!(f, "{}", header.join(" | ").trim_end())?;

        for row in 0..self.height() {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c.get(row).unwrap_or(NULL), w = *w))
                .collect();
            writeln!(f, "{}", cells.join(" | ").trim_end())?;
        }
        Ok(())
    }
}
