//! Synthetic coordinate axes and gridded datasets.
//!
//! Axes are built from integer steps so that an ascending axis and its
//! descending mirror contain bit-identical samples.

use netcdf_parser::{AttributeValue, MemoryDataset, VariableHeader};

/// IMERG fill value for `precipitation`.
pub const IMERG_FILL: f64 = -9999.9;

/// Samples `min, min + step, ..., max`.
///
/// # Example
///
/// ```
/// use test_utils::ascending_axis;
///
/// assert_eq!(ascending_axis(0.0, 1.0, 0.5), vec![0.0, 0.5, 1.0]);
/// ```
pub fn ascending_axis(min: f64, max: f64, step: f64) -> Vec<f64> {
    let n = ((max - min) / step).round() as usize + 1;
    (0..n).map(|i| min + i as f64 * step).collect()
}

/// Samples `max, ..., min`; the exact reverse of [`ascending_axis`].
pub fn descending_axis(max: f64, min: f64, step: f64) -> Vec<f64> {
    let mut axis = ascending_axis(min, max, step);
    axis.reverse();
    axis
}

/// A `precipitation(lat, lon)` dataset on the given axes.
///
/// `value(lat, lon)` fills each cell; return NaN to write the fill value.
pub fn lat_lon_dataset(
    lats: Vec<f64>,
    lons: Vec<f64>,
    value: impl Fn(f64, f64) -> f64,
) -> MemoryDataset {
    let mut values = Vec::with_capacity(lats.len() * lons.len());
    for &lat in &lats {
        for &lon in &lons {
            values.push(fill_nan(value(lat, lon)));
        }
    }

    MemoryDataset::new()
        .coordinate("lat", lats)
        .coordinate("lon", lons)
        .variable(precipitation_header(&["lat", "lon"]), values)
}

/// An IMERG-shaped dataset: `precipitation(time, lon, lat)` on a 0.1 degree
/// grid of cell centres covering one degree around the given point.
pub fn imerg_dataset(
    center_lat: f64,
    center_lon: f64,
    value: impl Fn(f64, f64) -> f64,
) -> MemoryDataset {
    let lats = ascending_axis(center_lat - 0.45, center_lat + 0.45, 0.1);
    let lons = ascending_axis(center_lon - 0.45, center_lon + 0.45, 0.1);

    let mut values = Vec::with_capacity(lats.len() * lons.len());
    for &lon in &lons {
        for &lat in &lats {
            values.push(fill_nan(value(lat, lon)));
        }
    }

    MemoryDataset::new()
        .dimension("time", 1)
        .coordinate("lon", lons)
        .coordinate("lat", lats)
        .variable(precipitation_header(&["time", "lon", "lat"]), values)
}

fn precipitation_header(dims: &[&str]) -> VariableHeader {
    VariableHeader::new("precipitation", dims)
        .with_attribute("units", AttributeValue::Text("mm/day".to_string()))
        .with_attribute("_FillValue", AttributeValue::Number(IMERG_FILL))
}

fn fill_nan(v: f64) -> f64 {
    if v.is_nan() {
        IMERG_FILL
    } else {
        v
    }
}
