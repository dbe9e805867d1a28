//! In-memory datasets, keyed by file name.
//!
//! Lets callers (and tests) exercise grid code without NetCDF files on disk.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{NetCdfError, NetCdfResult};
use crate::header::{Dimension, NcHeader, VariableHeader};
use crate::reader::{check_len, unpack, NetCdfReader};

/// A header plus raw (packed) values for each variable.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    pub header: NcHeader,
    values: HashMap<String, Vec<f64>>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a coordinate variable together with its dimension.
    pub fn coordinate(mut self, name: &str, values: Vec<f64>) -> Self {
        self.header.dimensions.push(Dimension {
            name: name.to_string(),
            len: values.len(),
        });
        self.header.variables.push(VariableHeader::new(name, &[name]));
        self.values.insert(name.to_string(), values);
        self
    }

    /// Declare a dimension without a coordinate variable (e.g. `time`, `nv`).
    pub fn dimension(mut self, name: &str, len: usize) -> Self {
        self.header.dimensions.push(Dimension {
            name: name.to_string(),
            len,
        });
        self
    }

    /// Declare a data variable. Values are stored as given and unpacked on read.
    pub fn variable(mut self, var: VariableHeader, values: Vec<f64>) -> Self {
        self.values.insert(var.name.clone(), values);
        self.header.variables.push(var);
        self
    }
}

/// Reader serving [`MemoryDataset`]s by file name; the directory part of the
/// path is ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    datasets: HashMap<String, MemoryDataset>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, file_name: impl Into<String>, dataset: MemoryDataset) -> Self {
        self.datasets.insert(file_name.into(), dataset);
        self
    }

    fn dataset(&self, path: &Path) -> NetCdfResult<&MemoryDataset> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| self.datasets.get(n))
            .ok_or_else(|| {
                NetCdfError::invalid(format!("{} is not a NetCDF dataset", path.display()))
            })
    }
}

impl NetCdfReader for MemoryReader {
    fn read_header(&self, path: &Path) -> NetCdfResult<NcHeader> {
        Ok(self.dataset(path)?.header.clone())
    }

    fn read_variables(
        &self,
        path: &Path,
        header: &NcHeader,
        names: &[&str],
    ) -> NetCdfResult<HashMap<String, Vec<f64>>> {
        let dataset = self.dataset(path)?;
        let mut out = HashMap::with_capacity(names.len());

        for name in names {
            let var = header
                .variable(name)
                .ok_or_else(|| NetCdfError::missing(format!("variable {}", name)))?;
            let raw = dataset
                .values
                .get(*name)
                .cloned()
                .ok_or_else(|| NetCdfError::missing(format!("data for {}", name)))?;
            check_len(header, name, raw.len())?;
            out.insert(name.to_string(), unpack(raw, var));
        }
        Ok(out)
    }
}
