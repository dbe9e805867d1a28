//! Dataset header: dimensions, variables and their attributes.

use std::collections::BTreeMap;

/// A named dimension and its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// A single attribute value. Only the first element of array attributes is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(v) => Some(*v),
            AttributeValue::Text(_) => None,
        }
    }
}

/// Declaration of one variable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableHeader {
    pub name: String,
    /// Dimension names, outermost first.
    pub dimensions: Vec<String>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl VariableHeader {
    pub fn new(name: impl Into<String>, dimensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Numeric attribute lookup.
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttributeValue::as_f64)
    }

    /// A coordinate variable is 1-D and named after its own dimension.
    pub fn is_coordinate(&self) -> bool {
        self.dimensions.len() == 1 && self.dimensions[0] == self.name
    }
}

/// Dimensions and variables of a dataset, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NcHeader {
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<VariableHeader>,
}

impl NcHeader {
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&VariableHeader> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Variables that are not coordinate variables, in declaration order.
    pub fn data_variables(&self) -> impl Iterator<Item = &VariableHeader> {
        self.variables.iter().filter(|v| !v.is_coordinate())
    }

    /// Shape of a variable, resolved through the dimension table.
    pub fn shape(&self, variable: &str) -> Option<Vec<usize>> {
        self.variable(variable)?
            .dimensions
            .iter()
            .map(|d| self.dimension(d).map(|dim| dim.len))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NcHeader {
        NcHeader {
            dimensions: vec![
                Dimension { name: "time".into(), len: 1 },
                Dimension { name: "lon".into(), len: 4 },
                Dimension { name: "lat".into(), len: 3 },
            ],
            variables: vec![
                VariableHeader::new("time", &["time"]),
                VariableHeader::new("precipitation", &["time", "lon", "lat"]),
                VariableHeader::new("lat", &["lat"]),
                VariableHeader::new("lon", &["lon"]),
            ],
        }
    }

    #[test]
    fn test_data_variables_skip_coordinates() {
        let header = sample();
        let names: Vec<_> = header.data_variables().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["precipitation"]);
    }

    #[test]
    fn test_shape() {
        let header = sample();
        assert_eq!(header.shape("precipitation"), Some(vec![1, 4, 3]));
        assert_eq!(header.shape("missing"), None);
    }

    #[test]
    fn test_attributes() {
        let var = VariableHeader::new("precipitation", &["lat", "lon"])
            .with_attribute("units", AttributeValue::Text("mm/day".into()))
            .with_attribute("_FillValue", AttributeValue::Number(-9999.9));
        assert_eq!(
            var.attributes.get("units"),
            Some(&AttributeValue::Text("mm/day".into()))
        );
        assert_eq!(var.attr_f64("_FillValue"), Some(-9999.9));
        assert_eq!(var.attr_f64("units"), None);
    }
}
