// Middlebury .flo reader / writer
//
// Layout (all values little-endian):
//   magic:  f32 = 202021.25   (the bytes "PIEH")
//   width:  i32
//   height: i32
//   data:   f32 × (2 · width · height)
//
// The payload is read as one flat buffer and reshaped straight to
// [2, height, width]. Anything past the payload is ignored.

use std::fs;
use std::path::Path;

use flowkit_core::FlowField;

use crate::error::{DataResult, DatasetError};

/// Magic number at the head of every .flo file.
pub const FLO_MAGIC: f32 = 202021.25;

const HEADER_LEN: usize = 12;

/// Read and decode a .flo file.
pub fn read_flo(path: impl AsRef<Path>) -> DataResult<FlowField> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| DatasetError::io(path, e))?;
    decode_flo(&bytes, path)
}

/// Decode the bytes of a .flo file. `path` is only used for error messages.
pub fn decode_flo(data: &[u8], path: &Path) -> DataResult<FlowField> {
    if data.len() < HEADER_LEN {
        return Err(DatasetError::format(
            path,
            format!("header truncated: {} of {HEADER_LEN} bytes", data.len()),
        ));
    }

    let magic = f32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if magic != FLO_MAGIC {
        return Err(DatasetError::format(
            path,
            format!("invalid magic number {magic}, expected {FLO_MAGIC}"),
        ));
    }

    let w = read_i32_le(data, 4);
    let h = read_i32_le(data, 8);
    if w < 0 || h < 0 {
        return Err(DatasetError::format(
            path,
            format!("negative dimensions {w}x{h}"),
        ));
    }
    let (w, h) = (w as usize, h as usize);

    let expected_len = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(2 * 4))
        .and_then(|n| n.checked_add(HEADER_LEN))
        .ok_or_else(|| DatasetError::format(path, format!("dimensions {w}x{h} overflow")))?;
    if data.len() < expected_len {
        return Err(DatasetError::format(
            path,
            format!(
                "payload truncated: expected {expected_len} bytes for {w}x{h}, got {}",
                data.len()
            ),
        ));
    }
    if data.len() > expected_len {
        log::warn!(
            "{}: ignoring {} trailing bytes after .flo payload",
            path.display(),
            data.len() - expected_len
        );
    }

    let values: Vec<f32> = data[HEADER_LEN..expected_len]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(FlowField::from_vec(values, (2, h, w))?)
}

/// Read a little-endian i32 from `data` at byte offset `off`.
fn read_i32_le(data: &[u8], off: usize) -> i32 {
    i32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

// Writers

/// Encode a `[2, H, W]` flow field as .flo bytes.
pub fn encode_flo(flow: &FlowField) -> DataResult<Vec<u8>> {
    let (h, w) = flow_hw(flow)?;
    let mut buf = Vec::with_capacity(HEADER_LEN + flow.elem_count() * 4);
    buf.extend_from_slice(&FLO_MAGIC.to_le_bytes());
    buf.extend_from_slice(&header_dim(w, "width")?.to_le_bytes());
    buf.extend_from_slice(&header_dim(h, "height")?.to_le_bytes());
    for v in flow.as_slice() {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    Ok(buf)
}

/// A grid dimension as the i32 the .flo header stores.
fn header_dim(n: usize, what: &str) -> DataResult<i32> {
    i32::try_from(n).map_err(|_| {
        flowkit_core::Error::msg(format!("flow {what} {n} does not fit a .flo header")).into()
    })
}

/// Write a `[2, H, W]` flow field to a .flo file.
pub fn write_flo(path: impl AsRef<Path>, flow: &FlowField) -> DataResult<()> {
    let path = path.as_ref();
    let bytes = encode_flo(flow)?;
    fs::write(path, bytes).map_err(|e| DatasetError::io(path, e))
}

/// `(H, W)` of a flow field, checking it has two channels.
pub(crate) fn flow_hw(flow: &FlowField) -> DataResult<(usize, usize)> {
    let dims = flow.dims();
    if dims.len() != 3 || dims[0] != 2 {
        return Err(flowkit_core::Error::msg(format!(
            "flow field must have shape [2, H, W], got {}",
            flow.shape()
        ))
        .into());
    }
    Ok((dims[1], dims[2]))
}
