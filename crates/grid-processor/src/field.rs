//! A variable laid out over latitude, longitude and any number of other
//! dimensions, with box averaging.

use crate::error::{GridProcessorError, Result};
use crate::selection::{select_axis, AxisSelection};
use crate::types::BoundingBox;

/// Flattened values of one variable plus its lat/lon coordinates.
///
/// Values are row-major over `shape`. Latitude and longitude may sit at any
/// position among the dimensions (IMERG stores `(time, lon, lat)`); every
/// other dimension is averaged over.
#[derive(Debug, Clone)]
pub struct LatLonField {
    values: Vec<f64>,
    shape: Vec<usize>,
    lat_dim: usize,
    lon_dim: usize,
    lats: Vec<f64>,
    lons: Vec<f64>,
}

/// Per-axis selections for one bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSelection {
    pub lat: AxisSelection,
    pub lon: AxisSelection,
}

/// Finite-cell statistics over a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaStats {
    pub mean: Option<f64>,
    pub valid_pixels: usize,
    pub selected_cells: usize,
}

impl LatLonField {
    pub fn new(
        values: Vec<f64>,
        shape: Vec<usize>,
        lat_dim: usize,
        lon_dim: usize,
        lats: Vec<f64>,
        lons: Vec<f64>,
    ) -> Result<Self> {
        if lat_dim == lon_dim || lat_dim >= shape.len() || lon_dim >= shape.len() {
            return Err(GridProcessorError::axis(format!(
                "invalid lat/lon dimension positions {}/{} for shape {:?}",
                lat_dim, lon_dim, shape
            )));
        }
        if shape[lat_dim] != lats.len() || shape[lon_dim] != lons.len() {
            return Err(GridProcessorError::axis(format!(
                "coordinate lengths {}x{} do not match shape {:?}",
                lats.len(),
                lons.len(),
                shape
            )));
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(GridProcessorError::read_failed(format!(
                "{} values for shape {:?}",
                values.len(),
                shape
            )));
        }

        Ok(Self {
            values,
            shape,
            lat_dim,
            lon_dim,
            lats,
            lons,
        })
    }

    /// A plain 2-D `(lat, lon)` field.
    pub fn from_lat_lon(lats: Vec<f64>, lons: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        let shape = vec![lats.len(), lons.len()];
        Self::new(values, shape, 0, 1, lats, lons)
    }

    /// Select the lat/lon index ranges intersecting `bbox`.
    pub fn select(&self, bbox: &BoundingBox) -> Result<BoxSelection> {
        Ok(BoxSelection {
            lat: select_axis(&self.lats, bbox.min_lat, bbox.max_lat)?,
            lon: select_axis(&self.lons, bbox.min_lon, bbox.max_lon)?,
        })
    }

    /// Mean of the finite cells inside `bbox`.
    pub fn area_mean(&self, bbox: &BoundingBox) -> Result<AreaStats> {
        let selection = self.select(bbox)?;
        Ok(self.stats(&selection))
    }

    fn stats(&self, selection: &BoxSelection) -> AreaStats {
        let lat_stride: usize = self.shape[self.lat_dim + 1..].iter().product();
        let lon_stride: usize = self.shape[self.lon_dim + 1..].iter().product();
        let n_lat = self.shape[self.lat_dim];
        let n_lon = self.shape[self.lon_dim];

        let mut sum = 0.0;
        let mut valid = 0usize;
        let mut selected = 0usize;

        if !selection.lat.is_empty() && !selection.lon.is_empty() {
            for (idx, &value) in self.values.iter().enumerate() {
                let i_lat = (idx / lat_stride) % n_lat;
                let i_lon = (idx / lon_stride) % n_lon;
                if !selection.lat.range.contains(&i_lat) || !selection.lon.range.contains(&i_lon) {
                    continue;
                }
                selected += 1;
                if value.is_finite() {
                    sum += value;
                    valid += 1;
                }
            }
        }

        AreaStats {
            mean: (valid > 0).then(|| sum / valid as f64),
            valid_pixels: valid,
            selected_cells: selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{ascending_axis, assert_approx_eq, descending_axis};

    #[test]
    fn test_mean_ignores_non_finite() {
        let field = LatLonField::from_lat_lon(
            vec![0.0, 1.0],
            vec![10.0, 11.0],
            vec![2.0, f64::NAN, 4.0, f64::INFINITY],
        )
        .unwrap();

        let stats = field
            .area_mean(&BoundingBox::new(9.5, -0.5, 11.5, 1.5))
            .unwrap();
        assert_eq!(stats.valid_pixels, 2);
        assert_eq!(stats.selected_cells, 4);
        assert_approx_eq!(stats.mean.unwrap(), 3.0, 1e-12);
    }

    #[test]
    fn test_all_nan_box_has_no_mean() {
        let field =
            LatLonField::from_lat_lon(vec![0.0], vec![0.0], vec![f64::NAN]).unwrap();
        let stats = field
            .area_mean(&BoundingBox::around(0.0, 0.0, 10.0))
            .unwrap();
        assert_eq!(stats.mean, None);
        assert_eq!(stats.valid_pixels, 0);
        assert_eq!(stats.selected_cells, 1);
    }

    #[test]
    fn test_box_off_grid_has_no_mean() {
        let field = LatLonField::from_lat_lon(vec![0.0], vec![0.0], vec![5.0]).unwrap();
        let stats = field
            .area_mean(&BoundingBox::around(45.0, 45.0, 10.0))
            .unwrap();
        assert_eq!(stats.mean, None);
        assert_eq!(stats.selected_cells, 0);
    }

    #[test]
    fn test_descending_latitude_matches_ascending() {
        let lons = ascending_axis(-2.0, 2.0, 0.5);
        let asc = ascending_axis(-2.0, 2.0, 0.5);
        let desc = descending_axis(2.0, -2.0, 0.5);

        // Value depends on the true latitude only, so both layouts describe
        // the same geography.
        let values_for = |lats: &[f64]| -> Vec<f64> {
            lats.iter()
                .flat_map(|lat| lons.iter().map(move |_| lat * 10.0 + 100.0))
                .collect()
        };

        let a = LatLonField::from_lat_lon(asc.clone(), lons.clone(), values_for(&asc)).unwrap();
        let d = LatLonField::from_lat_lon(desc.clone(), lons.clone(), values_for(&desc)).unwrap();

        let bbox = BoundingBox::around(0.6, 0.0, 111.0);
        let sa = a.area_mean(&bbox).unwrap();
        let sd = d.area_mean(&bbox).unwrap();

        assert!(sa.valid_pixels > 0);
        assert_eq!(sa.valid_pixels, sd.valid_pixels);
        assert_approx_eq!(sa.mean.unwrap(), sd.mean.unwrap(), 1e-9);
    }

    #[test]
    fn test_lon_major_layout_with_time_dimension() {
        // shape (time=1, lon=3, lat=2), IMERG order
        let lats = vec![0.0, 1.0];
        let lons = vec![10.0, 11.0, 12.0];
        let values = vec![
            1.0, 2.0, // lon 10: lat 0, lat 1
            3.0, 4.0, // lon 11
            5.0, 6.0, // lon 12
        ];
        let field = LatLonField::new(values, vec![1, 3, 2], 2, 1, lats, lons).unwrap();

        // lat 1 only, lon 11..12
        let stats = field
            .area_mean(&BoundingBox::new(10.5, 0.5, 12.5, 1.5))
            .unwrap();
        assert_eq!(stats.valid_pixels, 2);
        assert_approx_eq!(stats.mean.unwrap(), 5.0, 1e-12);
    }

    #[test]
    fn test_shape_validation() {
        assert!(LatLonField::from_lat_lon(vec![0.0], vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(LatLonField::new(vec![1.0], vec![1], 0, 0, vec![0.0], vec![0.0]).is_err());
    }
}
