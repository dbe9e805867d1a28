//! Choosing which variable to average and where its lat/lon axes live.

use netcdf_parser::{NcHeader, VariableHeader};
use tracing::warn;

use crate::error::{GridProcessorError, Result};

/// Canonical IMERG precipitation names, tried in order.
pub const DEFAULT_VARIABLE_CANDIDATES: &[&str] = &["precipitation", "precipitationCal"];

/// Accepted latitude dimension names.
pub const LAT_NAMES: &[&str] = &["lat", "latitude"];

/// Accepted longitude dimension names.
pub const LON_NAMES: &[&str] = &["lon", "longitude"];

/// How the averaged variable was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableSource {
    /// Matched the candidate at this position in the list.
    Candidate(usize),
    /// No candidate existed; took the first declared data variable.
    FirstDataVariable,
}

/// The variable picked by [`resolve_variable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    pub name: String,
    pub source: VariableSource,
}

/// Walk the fallback chain: each candidate in order, then the first data
/// variable of the dataset.
pub fn resolve_variable(header: &NcHeader, candidates: &[String]) -> Result<ResolvedVariable> {
    if let Some((i, name)) = candidates
        .iter()
        .enumerate()
        .find(|(_, name)| header.variable(name).is_some())
    {
        return Ok(ResolvedVariable {
            name: name.clone(),
            source: VariableSource::Candidate(i),
        });
    }

    let first = header.data_variables().next().ok_or_else(|| {
        GridProcessorError::NoSuchVariable(format!(
            "none of {:?} present and dataset has no data variables",
            candidates
        ))
    })?;

    warn!(
        candidates = ?candidates,
        chosen = %first.name,
        "No canonical precipitation variable; using first data variable"
    );
    Ok(ResolvedVariable {
        name: first.name.clone(),
        source: VariableSource::FirstDataVariable,
    })
}

/// Position and coordinate-variable name of one spatial axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisDim {
    pub position: usize,
    pub name: String,
}

/// Find the latitude and longitude dimensions of `var`.
pub fn spatial_dims(header: &NcHeader, var: &VariableHeader) -> Result<(AxisDim, AxisDim)> {
    let lat = find_dim(header, var, LAT_NAMES, "latitude")?;
    let lon = find_dim(header, var, LON_NAMES, "longitude")?;
    Ok((lat, lon))
}

fn find_dim(
    header: &NcHeader,
    var: &VariableHeader,
    names: &[&str],
    label: &str,
) -> Result<AxisDim> {
    let (position, name) = var
        .dimensions
        .iter()
        .enumerate()
        .find(|(_, d)| names.contains(&d.as_str()))
        .ok_or_else(|| {
            GridProcessorError::axis(format!(
                "variable {} has no {} dimension (dims: {:?})",
                var.name, label, var.dimensions
            ))
        })?;

    if header.variable(name).is_none() {
        return Err(GridProcessorError::axis(format!(
            "{} dimension {} has no coordinate variable",
            label, name
        )));
    }

    Ok(AxisDim {
        position,
        name: name.clone(),
    })
}
