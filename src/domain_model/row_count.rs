use super::UpsertOutcome;
use std::fmt;

/// Rows-affected values an engine reports for each branch of a merge write.
///
/// MySQL counts an `ON DUPLICATE KEY UPDATE` that changes the existing row as
/// two affected rows, while a fresh insert counts as one. Engines whose two
/// values coincide cannot be classified and are rejected by [`Self::try_new`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RowCountConvention {
    insert_rows: u64,
    update_rows: u64,
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ConventionError {
    #[error("row count for the {0} path must be non-zero")]
    Zero(&'static str),
    #[error("insert and update paths both report {0} row(s)")]
    Ambiguous(u64),
}

impl RowCountConvention {
    pub const MYSQL: RowCountConvention = RowCountConvention {
        insert_rows: 1,
        update_rows: 2,
    };

    pub fn try_new(insert_rows: u64, update_rows: u64) -> Result<Self, ConventionError> {
        if insert_rows == 0 {
            return Err(ConventionError::Zero("insert"));
        }
        if update_rows == 0 {
            return Err(ConventionError::Zero("update"));
        }
        if insert_rows == update_rows {
            return Err(ConventionError::Ambiguous(insert_rows));
        }

        Ok(RowCountConvention {
            insert_rows,
            update_rows,
        })
    }

    pub fn insert_rows(&self) -> u64 {
        self.insert_rows
    }

    pub fn update_rows(&self) -> u64 {
        self.update_rows
    }

    pub fn classify(&self, rows_affected: u64) -> Option<UpsertOutcome> {
        if rows_affected == self.insert_rows {
            Some(UpsertOutcome::Inserted)
        } else if rows_affected == self.update_rows {
            Some(UpsertOutcome::Updated)
        } else {
            None
        }
    }
}

impl Default for RowCountConvention {
    fn default() -> Self {
        Self::MYSQL
    }
}

impl fmt::Display for RowCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insert={} or update={}",
            self.insert_rows, self.update_rows
        )
    }
}
