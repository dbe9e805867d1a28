//! NetCDF reader for gridded lat/lon datasets (GPM IMERG daily files).
//!
//! This crate reads the header and the full contents of selected variables
//! from NetCDF-4 files. Values come back unpacked as `f64`, with fill values
//! mapped to NaN.
//!
//! # Implementation Notes
//!
//! The default [`NcdumpReader`] shells out to the `ncdump` command-line tool
//! and parses its CDL output, so nothing needs to be linked at build time.
//! Enable the `native` feature (requires libhdf5-dev and libnetcdf-dev) to
//! read files directly through libnetcdf with [`NativeReader`].
//! [`MemoryReader`] serves datasets built in memory.

pub mod cdl;
pub mod error;
pub mod header;
pub mod memory;
#[cfg(feature = "native")]
pub mod native;
pub mod reader;

use std::sync::Arc;

pub use error::{NetCdfError, NetCdfResult};
pub use header::{AttributeValue, Dimension, NcHeader, VariableHeader};
pub use memory::{MemoryDataset, MemoryReader};
#[cfg(feature = "native")]
pub use native::NativeReader;
pub use reader::{NcdumpReader, NetCdfReader};

/// The best reader compiled into this build.
///
/// `ncdump` is only consulted when the `native` feature is off.
pub fn default_reader(ncdump: &str) -> Arc<dyn NetCdfReader> {
    #[cfg(feature = "native")]
    {
        let _ = ncdump;
        Arc::new(NativeReader)
    }
    #[cfg(not(feature = "native"))]
    {
        Arc::new(NcdumpReader::new(ncdump))
    }
}
