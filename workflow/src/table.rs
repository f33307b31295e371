use anyhow::Result;

use crate::{Error, SubtaskKey, TASK_COLUMN};

const QUOTE: char = '"';

/// One task's subtask directories, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskRow {
    pub task: String,
    pub paths: Vec<String>,
}

/// Table of subtask directories for a group:
/// one row per task, one column per subtask key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskTable {
    columns: Vec<String>,
    rows: Vec<SubtaskRow>,
}

impl SubtaskTable {
    pub fn new(keys: &[SubtaskKey]) -> Self {
        Self {
            columns: keys.iter().map(SubtaskKey::to_string).collect(),
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[SubtaskRow] {
        &self.rows
    }

    pub fn push(&mut self, task: &str, paths: Vec<String>) -> Result<(), Error> {
        if paths.len() != self.columns.len() {
            return Err(Error::RowLength(
                task.to_owned(),
                paths.len(),
                self.columns.len(),
            ));
        }
        self.rows.push(SubtaskRow {
            task: task.to_owned(),
            paths,
        });
        Ok(())
    }

    /// Path of one subtask, by row and key.
    pub fn path(&self, row: usize, key: &SubtaskKey) -> Option<&str> {
        let key = key.to_string();
        let col = self.columns.iter().position(|col| *col == key)?;
        self.rows.get(row).map(|row| row.paths[col].as_str())
    }

    pub fn to_csv(&self) -> String {
        let mut buf = String::new();
        syntax::csv::write_record(
            &mut buf,
            std::iter::once(TASK_COLUMN).chain(self.columns.iter().map(String::as_str)),
            QUOTE,
        );
        for row in &self.rows {
            syntax::csv::write_record(
                &mut buf,
                std::iter::once(row.task.as_str()).chain(row.paths.iter().map(String::as_str)),
                QUOTE,
            );
        }
        buf
    }

    pub fn from_csv(text: &str) -> Result<Self> {
        let mut records = syntax::csv::parse_records(text, QUOTE)?.into_iter();
        let mut header = records.next().unwrap_or_default().into_iter();
        if header.next().as_deref() != Some(TASK_COLUMN) {
            return Err(Error::ColumnNotFound(TASK_COLUMN.to_owned()).into());
        }
        let mut table = Self {
            columns: header.collect(),
            rows: Vec::new(),
        };
        for record in records {
            let mut cells = record.into_iter();
            let task = cells.next().unwrap_or_default();
            table.push(&task, cells.collect())?;
        }
        Ok(table)
    }
}
