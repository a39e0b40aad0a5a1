use crate::{CompareError, CompareResult};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

/// Numeric grid read from one integrator output file,
/// rows are samples and columns are recorded quantities.
/// Values are stored row-major and never change after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    source: String,
    nrows: usize,
    ncols: usize,
    values: Vec<f64>,
}

impl ResultTable {
    /// Read a whitespace delimited table from disk.
    /// Blank lines and `#` comments are skipped, the first data line fixes the column count.
    pub fn load<P: AsRef<Path>>(path: P) -> CompareResult<ResultTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CompareError::from_io(path.to_path_buf(), e))?;
        let table = ResultTable::from_reader(BufReader::new(file), path.display().to_string())?;
        log::debug!(
            "loaded {} with {} rows and {} columns",
            table.source,
            table.nrows,
            table.ncols
        );
        Ok(table)
    }

    /// Parse a table from any buffered reader, `source` names it in error messages.
    pub fn from_reader<R: BufRead, S: Into<String>>(reader: R, source: S) -> CompareResult<ResultTable> {
        let source = source.into();
        let mut values: Vec<f64> = Vec::new();
        let mut nrows = 0;
        let mut ncols = 0;
        for (i, l) in reader.lines().enumerate() {
            let lineno = i + 1;
            let line = match l {
                Ok(l_ok) => l_ok,
                Err(l_err) if l_err.kind() == std::io::ErrorKind::InvalidData => {
                    return Err(malformed(&source, lineno, "line is not valid UTF-8".to_string()));
                }
                Err(l_err) => return Err(CompareError::from_io(PathBuf::from(&source), l_err)),
            };
            let data = match line.find('#') {
                Some(pos) => &line[..pos],
                None => &line[..],
            };
            let mut fields = 0;
            for field in data.split_whitespace() {
                let v: f64 = field.parse().map_err(|_| {
                    malformed(&source, lineno, format!("field '{}' is not a number", field))
                })?;
                values.push(v);
                fields += 1;
            }
            if fields == 0 {
                continue;
            }
            if nrows == 0 {
                ncols = fields;
            } else if fields != ncols {
                return Err(malformed(
                    &source,
                    lineno,
                    format!("expected {} fields, found {}", ncols, fields),
                ));
            }
            nrows += 1;
        }
        Ok(ResultTable {
            source,
            nrows,
            ncols,
            values,
        })
    }

    /// Build a table from columns of equal length.
    pub fn from_columns<S: Into<String>>(source: S, columns: Vec<Vec<f64>>) -> CompareResult<ResultTable> {
        let source = source.into();
        let ncols = columns.len();
        let nrows = columns.first().map_or(0, Vec::len);
        if let Some((k, c)) = columns.iter().enumerate().find(|(_, c)| c.len() != nrows) {
            return Err(malformed(
                &source,
                0,
                format!("column {} has {} values, expected {}", k, c.len(), nrows),
            ));
        }
        let mut values = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            values.extend(columns.iter().map(|c| c[i]));
        }
        Ok(ResultTable {
            source,
            nrows,
            ncols,
            values,
        })
    }

    /// Name of the file (or reader) the table came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.nrows {
            return None;
        }
        let start = index * self.ncols;
        Some(&self.values[start..start + self.ncols])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.nrows).filter_map(move |i| self.row(i))
    }

    /// Copy of one column, one value per row.
    pub fn column(&self, index: usize) -> CompareResult<Vec<f64>> {
        if index >= self.ncols {
            return Err(CompareError::ColumnOutOfRange {
                source_name: self.source.clone(),
                index,
                width: self.ncols,
            });
        }
        Ok(self
            .values
            .iter()
            .skip(index)
            .step_by(self.ncols)
            .copied()
            .collect())
    }
}

fn malformed(source: &str, line: usize, reason: String) -> CompareError {
    CompareError::MalformedTable {
        source_name: source.to_string(),
        line,
        reason,
    }
}

impl FromStr for ResultTable {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResultTable::from_reader(s.as_bytes(), "<memory>")
    }
}

impl std::fmt::Display for ResultTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", fields.join(" "))?;
        }
        Ok(())
    }
}

/// Tables opened during one run, so series naming the same file share one load.
#[derive(Debug, Default)]
pub struct TableSet {
    tables: HashMap<PathBuf, Rc<ResultTable>>,
}

impl TableSet {
    pub fn new() -> TableSet {
        TableSet::default()
    }

    pub fn get<P: AsRef<Path>>(&mut self, path: P) -> CompareResult<Rc<ResultTable>> {
        let path = path.as_ref();
        if let Some(table) = self.tables.get(path) {
            return Ok(Rc::clone(table));
        }
        let table = Rc::new(ResultTable::load(path)?);
        self.tables.insert(path.to_path_buf(), Rc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
