//! Readers that turn a NetCDF file into a header and unpacked variable values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::cdl;
use crate::error::{NetCdfError, NetCdfResult};
use crate::header::{NcHeader, VariableHeader};

/// Source of NetCDF headers and variable data.
///
/// Values returned by [`NetCdfReader::read_variables`] are unpacked: fill and
/// missing values are NaN and `scale_factor`/`add_offset` have been applied.
/// Each vector is flattened row-major over the variable's dimensions.
pub trait NetCdfReader: Send + Sync {
    /// Read dimensions, variables and attributes.
    fn read_header(&self, path: &Path) -> NetCdfResult<NcHeader>;

    /// Read the full contents of the named variables.
    fn read_variables(
        &self,
        path: &Path,
        header: &NcHeader,
        names: &[&str],
    ) -> NetCdfResult<HashMap<String, Vec<f64>>>;
}

/// Apply `_FillValue`, `missing_value`, `scale_factor` and `add_offset`.
pub fn unpack(raw: Vec<f64>, var: &VariableHeader) -> Vec<f64> {
    let fill = var.attr_f64("_FillValue");
    let missing = var.attr_f64("missing_value");
    let scale = var.attr_f64("scale_factor").unwrap_or(1.0);
    let offset = var.attr_f64("add_offset").unwrap_or(0.0);

    raw.into_iter()
        .map(|v| {
            if Some(v) == fill || Some(v) == missing {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect()
}

/// Check that a variable holds exactly as many values as its shape implies.
pub(crate) fn check_len(header: &NcHeader, name: &str, len: usize) -> NetCdfResult<()> {
    let shape = header
        .shape(name)
        .ok_or_else(|| NetCdfError::missing(format!("dimensions of {}", name)))?;
    let expected: usize = shape.iter().product();
    if expected != len {
        return Err(NetCdfError::invalid(format!(
            "{} has {} values, expected {} for shape {:?}",
            name, len, expected, shape
        )));
    }
    Ok(())
}

/// Reader backed by the `ncdump` command-line tool.
///
/// Slower than the native library but needs nothing at build time; the
/// `ncdump` binary (netcdf-bin) must be available at runtime.
#[derive(Debug, Clone)]
pub struct NcdumpReader {
    binary: PathBuf,
}

impl Default for NcdumpReader {
    fn default() -> Self {
        Self::new("ncdump")
    }
}

impl NcdumpReader {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, args: &[&str], path: &Path) -> NetCdfResult<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| {
                NetCdfError::CommandError(format!(
                    "Failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(NetCdfError::CommandError(format!(
                "ncdump failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl NetCdfReader for NcdumpReader {
    fn read_header(&self, path: &Path) -> NetCdfResult<NcHeader> {
        debug!(path = %path.display(), "Reading NetCDF header with ncdump");
        let text = self.run(&["-h"], path)?;
        cdl::parse_header(&text)
    }

    fn read_variables(
        &self,
        path: &Path,
        header: &NcHeader,
        names: &[&str],
    ) -> NetCdfResult<HashMap<String, Vec<f64>>> {
        for name in names {
            if header.variable(name).is_none() {
                return Err(NetCdfError::missing(format!("variable {}", name)));
            }
        }

        let list = names.join(",");
        debug!(path = %path.display(), variables = %list, "Reading NetCDF data with ncdump");
        // High precision so coordinates survive the text round trip
        let text = self.run(&["-v", &list, "-p", "9,17"], path)?;
        let mut raw = cdl::parse_data(&text, names)?;

        let mut out = HashMap::with_capacity(names.len());
        for name in names {
            let values = raw
                .remove(*name)
                .ok_or_else(|| NetCdfError::missing(format!("data for {}", name)))?;
            check_len(header, name, values.len())?;
            // Presence was checked above
            if let Some(var) = header.variable(name) {
                out.insert(name.to_string(), unpack(values, var));
            }
        }
        Ok(out)
    }
}
