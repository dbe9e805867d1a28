//! Parsing of CDL text as printed by `ncdump`.
//!
//! Only the parts needed for lat/lon grids are understood: dimensions,
//! variable declarations, per-variable attributes and the numeric `data:`
//! section. Groups and compound types are ignored.

use std::collections::{HashMap, HashSet};

use crate::error::{NetCdfError, NetCdfResult};
use crate::header::{AttributeValue, Dimension, NcHeader, VariableHeader};

const CDL_TYPES: &[&str] = &[
    "char", "byte", "ubyte", "short", "ushort", "int", "uint", "int64", "uint64", "float",
    "double", "string", "long", "real",
];

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Dimensions,
    Variables,
}

/// Parse the header portion (`dimensions:` and `variables:`) of CDL output.
///
/// Anything from `data:` onwards is ignored, so the output of both
/// `ncdump -h` and `ncdump -v ...` is accepted.
pub fn parse_header(cdl: &str) -> NetCdfResult<NcHeader> {
    let mut header = NcHeader::default();
    let mut section = Section::Preamble;
    let mut saw_netcdf = false;

    for raw in cdl.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("netcdf ") {
            saw_netcdf = true;
            continue;
        }
        match line {
            "dimensions:" => {
                section = Section::Dimensions;
                continue;
            }
            "variables:" => {
                section = Section::Variables;
                continue;
            }
            "data:" => break,
            _ => {}
        }
        if line.starts_with("//") || line.starts_with("group:") {
            continue;
        }

        match section {
            Section::Preamble => {}
            Section::Dimensions => {
                if let Some(dim) = parse_dimension(line)? {
                    header.dimensions.push(dim);
                }
            }
            Section::Variables => {
                if line.contains('=') {
                    parse_attribute(line, &mut header.variables);
                } else if let Some(var) = parse_declaration(line) {
                    header.variables.push(var);
                }
            }
        }
    }

    if !saw_netcdf {
        return Err(NetCdfError::invalid("not CDL output: missing 'netcdf' preamble"));
    }
    Ok(header)
}

/// `lon = 3600 ;` or `time = UNLIMITED ; // (1 currently)`
fn parse_dimension(line: &str) -> NetCdfResult<Option<Dimension>> {
    let (decl, comment) = match line.split_once("//") {
        Some((d, c)) => (d, Some(c)),
        None => (line, None),
    };
    let Some((name, value)) = decl.split_once('=') else {
        return Ok(None);
    };
    let name = name.trim().to_string();
    let value = value.trim().trim_end_matches(';').trim();

    let len = if value == "UNLIMITED" {
        comment
            .and_then(|c| c.trim().strip_prefix('('))
            .and_then(|c| c.split_whitespace().next())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    } else {
        value
            .parse()
            .map_err(|_| NetCdfError::invalid(format!("Failed to parse dimension {}", name)))?
    };

    Ok(Some(Dimension { name, len }))
}

/// `float precipitation(time, lon, lat) ;`
fn parse_declaration(line: &str) -> Option<VariableHeader> {
    let line = line.trim_end_matches(';').trim();
    let (ty, rest) = line.split_once(char::is_whitespace)?;
    if !CDL_TYPES.contains(&ty) {
        return None;
    }
    let rest = rest.trim();

    let (name, dimensions) = match rest.split_once('(') {
        Some((name, dims)) => {
            let dims = dims.trim_end_matches(')');
            let dims = dims
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
            (name.trim().to_string(), dims)
        }
        None => (rest.to_string(), Vec::new()),
    };

    Some(VariableHeader {
        name,
        dimensions,
        ..Default::default()
    })
}

/// `precipitation:_FillValue = -9999.9f ;`
///
/// Global attributes (`:title = ...`) and attributes of undeclared
/// variables are dropped.
fn parse_attribute(line: &str, variables: &mut [VariableHeader]) {
    let Some((lhs, rhs)) = line.split_once('=') else {
        return;
    };
    let Some((var_name, attr_name)) = lhs.trim().split_once(':') else {
        return;
    };
    if var_name.is_empty() {
        return;
    }
    let Some(var) = variables.iter_mut().rev().find(|v| v.name == var_name) else {
        return;
    };

    let value = rhs.trim().trim_end_matches(';').trim();
    let parsed = if let Some(text) = value.strip_prefix('"') {
        let text = text.split('"').next().unwrap_or_default();
        Some(AttributeValue::Text(text.to_string()))
    } else {
        value
            .split(',')
            .next()
            .and_then(parse_number)
            .map(AttributeValue::Number)
    };

    if let Some(parsed) = parsed {
        var.attributes.insert(attr_name.trim().to_string(), parsed);
    }
}

/// Parse a CDL numeric literal, dropping type suffixes (`-9999.9f`, `2s`, `10UL`).
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let token = token.trim_end_matches(|c: char| {
        matches!(c, 'f' | 'F' | 'd' | 'D' | 's' | 'S' | 'b' | 'B' | 'l' | 'L' | 'u' | 'U')
    });
    token.parse().ok()
}

/// Parse the `data:` section for the requested variables.
///
/// Fill markers (`_`) become NaN. Variables not listed in `names` are skipped
/// without being parsed.
pub fn parse_data(cdl: &str, names: &[&str]) -> NetCdfResult<HashMap<String, Vec<f64>>> {
    let start = cdl
        .lines()
        .scan(0usize, |offset, line| {
            let at = *offset;
            *offset += line.len() + 1;
            Some((at, line))
        })
        .find(|(_, line)| line.trim() == "data:")
        .map(|(at, line)| at + line.len())
        .ok_or_else(|| NetCdfError::missing("data section"))?;

    let wanted: HashSet<&str> = names.iter().copied().collect();
    let mut out = HashMap::new();

    for statement in split_statements(&cdl[start..]) {
        let Some((name, values)) = statement.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if !wanted.contains(name) {
            continue;
        }

        let mut parsed = Vec::new();
        for token in values.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if token == "_" {
                parsed.push(f64::NAN);
                continue;
            }
            let value = parse_number(token).ok_or_else(|| {
                NetCdfError::invalid(format!("non-numeric value '{}' in {}", token, name))
            })?;
            parsed.push(value);
        }
        out.insert(name.to_string(), parsed);
    }

    Ok(out)
}

/// Split on `;` outside double-quoted strings.
fn split_statements(text: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut begin = 0;

    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                statements.push(&text[begin..i]);
                begin = i + 1;
            }
            _ => {}
        }
    }
    statements
}
