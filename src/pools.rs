use std::path::Path;

use crate::error::BoardError;

/// One pool per grid column.
pub const POOL_COLUMNS: usize = 5;
/// A column needs at least this many labels to fill five cells without
/// repeats.
pub const MIN_POOL_SIZE: usize = 5;

/// The five label pools, one per grid column, in input order.
#[derive(Debug, Clone)]
pub struct Pools {
    columns: [Vec<String>; POOL_COLUMNS],
}

impl Pools {
    /// Loads pools from a CSV file: the header row is skipped, then every
    /// non-empty cell of each of the five columns is collected down that
    /// column. Short records simply contribute nothing to the missing
    /// columns.
    pub fn from_csv_path(path: &Path) -> Result<Self, BoardError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|err| BoardError::InputParse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        let mut columns: [Vec<String>; POOL_COLUMNS] = Default::default();
        for record in reader.records() {
            let record = record.map_err(|err| BoardError::InputParse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
            for (index, column) in columns.iter_mut().enumerate() {
                if let Some(value) = record.get(index) {
                    let value = value.trim();
                    if !value.is_empty() {
                        column.push(value.to_string());
                    }
                }
            }
        }

        let pools = Pools { columns };
        pools.validate()?;
        Ok(pools)
    }

    pub fn from_columns(columns: [Vec<String>; POOL_COLUMNS]) -> Self {
        Pools { columns }
    }

    /// Fails fast if any column cannot fill a board column without
    /// repeats. Sampling with replacement would silently produce invalid
    /// boards, so this aborts before any page is rendered.
    pub fn validate(&self) -> Result<(), BoardError> {
        for (index, column) in self.columns.iter().enumerate() {
            if column.len() < MIN_POOL_SIZE {
                return Err(BoardError::PoolTooSmall {
                    column: index + 1,
                    count: column.len(),
                });
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Vec<String>; POOL_COLUMNS] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> &[String] {
        &self.columns[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pools.csv");
        fs::write(&path, content).expect("write csv");
        (dir, path)
    }

    #[test]
    fn loads_columns_and_skips_header() {
        let (_dir, path) = write_csv(
            "A,B,C,D,E\n\
             a1,b1,c1,d1,e1\n\
             a2,b2,c2,d2,e2\n\
             a3,b3,c3,d3,e3\n\
             a4,b4,c4,d4,e4\n\
             a5,b5,c5,d5,e5\n",
        );
        let pools = Pools::from_csv_path(&path).expect("load pools");
        assert_eq!(pools.column(0), ["a1", "a2", "a3", "a4", "a5"]);
        assert_eq!(pools.column(4), ["e1", "e2", "e3", "e4", "e5"]);
    }

    #[test]
    fn drops_empty_cells_and_allows_uneven_columns() {
        let (_dir, path) = write_csv(
            "A,B,C,D,E\n\
             a1,b1,c1,d1,e1\n\
             a2,,c2,d2,e2\n\
             a3,b2,c3,d3,e3\n\
             a4,b3,c4,d4,e4\n\
             a5,b4,c5,d5,e5\n\
             a6,b5,c6,d6,e6\n",
        );
        let pools = Pools::from_csv_path(&path).expect("load pools");
        assert_eq!(pools.column(0).len(), 6);
        assert_eq!(pools.column(1), ["b1", "b2", "b3", "b4", "b5"]);
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let (_dir, path) = write_csv(
            "A,B,C,D,E\n\
             \"one, two\",b1,c1,d1,e1\n\
             a2,b2,c2,d2,e2\n\
             a3,b3,c3,d3,e3\n\
             a4,b4,c4,d4,e4\n\
             a5,b5,c5,d5,e5\n",
        );
        let pools = Pools::from_csv_path(&path).expect("load pools");
        assert_eq!(pools.column(0)[0], "one, two");
    }

    #[test]
    fn short_pool_is_rejected() {
        let (_dir, path) = write_csv(
            "A,B,C,D,E\n\
             a1,b1,c1,d1,e1\n\
             a2,b2,c2,d2,e2\n\
             a3,b3,c3,d3,e3\n\
             a4,b4,c4,d4,e4\n\
             a5,,c5,d5,e5\n",
        );
        let err = Pools::from_csv_path(&path).expect_err("must reject");
        match err {
            BoardError::PoolTooSmall { column, count } => {
                assert_eq!(column, 2);
                assert_eq!(count, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Pools::from_csv_path(&dir.path().join("nope.csv")).expect_err("must fail");
        assert!(matches!(err, BoardError::InputParse { .. }));
    }
}
