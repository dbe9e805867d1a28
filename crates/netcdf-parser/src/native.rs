//! Native NetCDF reading using the netcdf library.
//!
//! Much faster than the ncdump subprocess: values are read as binary
//! doubles instead of being printed and re-parsed. Requires libnetcdf and
//! libhdf5 at build time.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Once;

use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::header::{AttributeValue, Dimension, NcHeader, VariableHeader};
use crate::reader::{check_len, unpack, NetCdfReader};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). Safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Reader backed by libnetcdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeReader;

impl NativeReader {
    fn open(path: &Path) -> NetCdfResult<netcdf::File> {
        silence_hdf5_errors();
        netcdf::open(path)
            .map_err(|e| NetCdfError::invalid(format!("Failed to open NetCDF: {}", e)))
    }
}

impl NetCdfReader for NativeReader {
    fn read_header(&self, path: &Path) -> NetCdfResult<NcHeader> {
        debug!(path = %path.display(), "Reading NetCDF header natively");
        let file = Self::open(path)?;

        let dimensions = file
            .dimensions()
            .map(|d| Dimension {
                name: d.name().to_string(),
                len: d.len(),
            })
            .collect();

        let variables = file
            .variables()
            .map(|var| VariableHeader {
                name: var.name().to_string(),
                dimensions: var.dimensions().iter().map(|d| d.name().to_string()).collect(),
                attributes: read_attributes(&var),
            })
            .collect();

        Ok(NcHeader {
            dimensions,
            variables,
        })
    }

    fn read_variables(
        &self,
        path: &Path,
        header: &NcHeader,
        names: &[&str],
    ) -> NetCdfResult<HashMap<String, Vec<f64>>> {
        let file = Self::open(path)?;
        let mut out = HashMap::with_capacity(names.len());

        for name in names {
            let var_header = header
                .variable(name)
                .ok_or_else(|| NetCdfError::missing(format!("variable {}", name)))?;
            let var = file
                .variable(name)
                .ok_or_else(|| NetCdfError::missing(format!("variable {}", name)))?;

            // Read all extents; libnetcdf converts to double
            let raw: Vec<f64> = var
                .get_values(..)
                .map_err(|e| NetCdfError::invalid(format!("Failed to read {}: {}", name, e)))?;

            check_len(header, name, raw.len())?;
            out.insert(name.to_string(), unpack(raw, var_header));
        }
        Ok(out)
    }
}

fn read_attributes(var: &netcdf::Variable) -> BTreeMap<String, AttributeValue> {
    let mut attributes = BTreeMap::new();
    for attr in var.attributes() {
        let Ok(value) = attr.value() else {
            continue;
        };
        let parsed = match value {
            netcdf::AttributeValue::Str(s) => Some(AttributeValue::Text(s)),
            other => f64::try_from(other).ok().map(AttributeValue::Number),
        };
        if let Some(parsed) = parsed {
            attributes.insert(attr.name().to_string(), parsed);
        }
    }
    attributes
}
