// KITTI 16-bit PNG flow reader / writer
//
// Each pixel of a KITTI flow_occ / flow_noc PNG holds three u16 channels:
//   R, G: flow u, v in fixed point, raw = flow · 64 + 2^15
//   B:    validity, 1 = ground truth present, 0 = absent
//
// Decoding inverts the fixed point: flow = (raw − 32768) / 64. Every u16
// maps exactly onto an f32 in this range, so the conversion is lossless.

use std::path::Path;

use flowkit_core::{FlowField, ValidMask};
use image::{ColorType, ImageBuffer, Rgb};

use crate::error::{DataResult, DatasetError};
use crate::flo::flow_hw;

/// Fixed-point offset added to flow before storage.
pub const FLOW_OFFSET: f32 = 32768.0;
/// Fixed-point scale (1/64 pixel precision).
pub const FLOW_SCALE: f32 = 64.0;

/// 16-bit RGB pixel buffer as produced by the `image` crate.
pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Read a KITTI flow PNG into `(flow [2, H, W], valid [H, W])`.
pub fn read_flow_png(path: impl AsRef<Path>) -> DataResult<(FlowField, ValidMask)> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| DatasetError::from_image(path, e))?;
    let raw = match img.color() {
        ColorType::Rgb16 | ColorType::Rgba16 => img.into_rgb16(),
        other => {
            return Err(DatasetError::format(
                path,
                format!("expected a 16-bit RGB PNG, got {other:?}"),
            ))
        }
    };
    decode_flow_png(&raw)
}

/// Convert raw 16-bit channels into flow and validity grids.
pub fn decode_flow_png(raw: &Rgb16Image) -> DataResult<(FlowField, ValidMask)> {
    let (w, h) = raw.dimensions();
    let npix = (w as usize) * (h as usize);

    // [H, W, 3] interleaved -> [2, H, W] planar + [H, W]
    let mut flow = vec![0.0f32; 2 * npix];
    let mut valid = vec![false; npix];
    for (i, px) in raw.pixels().enumerate() {
        let [u, v, ok] = px.0;
        flow[i] = (u as f32 - FLOW_OFFSET) / FLOW_SCALE;
        flow[npix + i] = (v as f32 - FLOW_OFFSET) / FLOW_SCALE;
        valid[i] = ok != 0;
    }

    let (h, w) = (h as usize, w as usize);
    Ok((
        FlowField::from_vec(flow, (2, h, w))?,
        ValidMask::from_vec(valid, (h, w))?,
    ))
}

/// Encode flow and validity into 16-bit channels. Out-of-range flow saturates.
pub fn encode_flow_png(flow: &FlowField, valid: &ValidMask) -> DataResult<Rgb16Image> {
    let (h, w) = flow_hw(flow)?;
    if valid.dims() != [h, w].as_slice() {
        return Err(flowkit_core::Error::ShapeMismatch {
            expected: (h, w).into(),
            got: valid.shape().clone(),
        }
        .into());
    }

    let npix = h * w;
    let data = flow.as_slice();
    let mask = valid.as_slice();
    let to_raw = |f: f32| (f * FLOW_SCALE + FLOW_OFFSET).round().clamp(0.0, 65535.0) as u16;

    let mut out = Rgb16Image::new(w as u32, h as u32);
    for (i, px) in out.pixels_mut().enumerate() {
        *px = Rgb([
            to_raw(data[i]),
            to_raw(data[npix + i]),
            u16::from(mask[i]),
        ]);
    }
    Ok(out)
}

/// Write flow and validity as a KITTI-style 16-bit PNG.
pub fn write_flow_png(
    path: impl AsRef<Path>,
    flow: &FlowField,
    valid: &ValidMask,
) -> DataResult<()> {
    let path = path.as_ref();
    let img = encode_flow_png(flow, valid)?;
    img.save(path).map_err(|e| DatasetError::from_image(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_raw_values() {
        let mut raw = Rgb16Image::new(2, 1);
        raw.put_pixel(0, 0, Rgb([32768, 32768 + 64, 1]));
        raw.put_pixel(1, 0, Rgb([0, 65535, 0]));
        let (flow, valid) = decode_flow_png(&raw).unwrap();

        assert_eq!(flow.dims(), &[2, 1, 2]);
        assert_eq!(valid.dims(), &[1, 2]);
        assert_eq!(flow.at(&[0, 0, 0]).unwrap(), 0.0);
        assert_eq!(flow.at(&[1, 0, 0]).unwrap(), 1.0);
        assert_eq!(flow.at(&[0, 0, 1]).unwrap(), -512.0);
        assert_eq!(flow.at(&[1, 0, 1]).unwrap(), (65535.0 - 32768.0) / 64.0);
        assert_eq!(valid.as_slice(), &[true, false]);
    }

    #[test]
    fn test_encode_saturates_and_quantises() {
        let flow = FlowField::from_vec(vec![1000.0, 0.25, -1000.0, -0.5], (2, 1, 2)).unwrap();
        let valid = ValidMask::from_vec(vec![true, false], (1, 2)).unwrap();
        let raw = encode_flow_png(&flow, &valid).unwrap();
        assert_eq!(raw.get_pixel(0, 0).0, [65535, 0, 1]);
        assert_eq!(raw.get_pixel(1, 0).0, [32768 + 16, 32768 - 32, 0]);
    }

    #[test]
    fn test_encode_mask_shape_mismatch() {
        let flow = FlowField::full((2, 2, 2), 0.0);
        let valid = ValidMask::full((2, 3), false);
        let err = encode_flow_png(&flow, &valid).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Grid(flowkit_core::Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_read_rejects_8bit_png() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("flow8.png");
        image::RgbImage::new(3, 2).save(&path).unwrap();
        let err = read_flow_png(&path).unwrap_err();
        match err {
            DatasetError::Format { reason, .. } => assert!(reason.contains("16-bit")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_rgba16_drops_alpha() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("flow_rgba.png");
        let mut img: ImageBuffer<image::Rgba<u16>, Vec<u16>> = ImageBuffer::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([32768 + 128, 32768 - 64, 1, 0]));
        img.put_pixel(1, 0, image::Rgba([32768, 32768, 0, 65535]));
        img.save(&path).unwrap();

        let (flow, valid) = read_flow_png(&path).unwrap();
        assert_eq!(flow.dims(), &[2, 1, 2]);
        assert_eq!(flow.as_slice(), &[2.0, 0.0, -1.0, 0.0]);
        assert_eq!(valid.as_slice(), &[true, false]);
    }
}
