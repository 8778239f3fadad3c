//! Minimal NPY (v1.0/v2.0) reader and writer for 1-D numeric arrays.
//!
//! Parses the header strictly and decodes little-endian `<f8`, `<f4`, and
//! `<i8` payloads into `f64`. Anything else (fortran order, higher
//! dimensions, unknown dtypes) is rejected as a data error.

use linkbench_core::{LinkBenchError, Result};
use std::path::Path;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Read a 1-D NPY file into `f64` values.
pub fn read_npy_1d(path: &Path) -> Result<Vec<f64>> {
    let bytes = std::fs::read(path)?;
    let data_err = |msg: &str| LinkBenchError::Data(format!("{}: {msg}", path.display()));

    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(data_err("not an NPY file"));
    }
    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => {
            let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
            (len, 10)
        }
        2 => {
            if bytes.len() < 12 {
                return Err(data_err("truncated NPY header"));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12)
        }
        _ => return Err(data_err("unsupported NPY version")),
    };

    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        return Err(data_err("truncated NPY header"));
    }
    let header = std::str::from_utf8(&bytes[header_start..data_start])
        .map_err(|_| data_err("non-ASCII NPY header"))?;

    if header.contains("'fortran_order': True") {
        return Err(data_err("fortran-ordered arrays are not supported"));
    }

    let descr = dict_str_value(header, "descr").ok_or_else(|| data_err("missing descr"))?;
    let item_size = match descr {
        "<f8" => 8,
        "<f4" => 4,
        "<i8" => 8,
        _ => return Err(data_err("unsupported dtype")),
    };

    let n = parse_1d_shape(header).ok_or_else(|| data_err("expected a 1-D shape"))?;
    let payload = &bytes[data_start..];
    if payload.len() < n * item_size {
        return Err(data_err("payload shorter than declared shape"));
    }

    let values = match descr {
        "<f8" => payload[..n * 8]
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect(),
        "<f4" => payload[..n * 4]
            .chunks_exact(4)
            .map(|b| f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            .collect(),
        "<i8" => payload[..n * 8]
            .chunks_exact(8)
            .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f64)
            .collect(),
        _ => unreachable!(),
    };
    Ok(values)
}

/// Write a 1-D `f64` array as NPY v1.0 (`<f8`, C order).
///
/// Used by fixtures and tooling that seed synthetic network directories.
pub fn write_npy_1d(path: &Path, values: &[f64]) -> Result<()> {
    let mut header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({},), }}",
        values.len()
    );
    // Pad so magic + length field + header is a multiple of 64, ending in \n
    let unpadded = 10 + header.len() + 1;
    header.push_str(&" ".repeat(unpadded.div_ceil(64) * 64 - unpadded));
    header.push('\n');

    let mut bytes = Vec::with_capacity(10 + header.len() + values.len() * 8);
    bytes.extend_from_slice(MAGIC);
    bytes.push(1);
    bytes.push(0);
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Extract a single-quoted string value from the header dict.
fn dict_str_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("'{key}':");
    let rest = &header[header.find(&needle)? + needle.len()..];
    let open = rest.find('\'')?;
    let rest = &rest[open + 1..];
    let close = rest.find('\'')?;
    Some(&rest[..close])
}

/// Parse `'shape': (n,)` out of the header; `None` unless exactly 1-D.
fn parse_1d_shape(header: &str) -> Option<usize> {
    let needle = "'shape':";
    let rest = &header[header.find(needle)? + needle.len()..];
    let open = rest.find('(')?;
    let close = rest.find(')')?;
    let dims: Vec<&str> = rest[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if dims.len() != 1 {
        return None;
    }
    dims[0].parse().ok()
}
