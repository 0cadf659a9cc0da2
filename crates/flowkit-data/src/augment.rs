// Flow Augmentation - random geometric transforms for flow samples
//
// Geometric augmentation of a flow sample must move both frames, the flow
// field and the mask together, and must also fix up the flow *values*:
// mirroring the image left-right reverses the sign of the horizontal
// displacement, mirroring top-bottom reverses the vertical one.
//
// Grid shapes that disagree with the images leave the sample untouched and
// log a warning; transforms are infallible by contract.

use flowkit_core::Grid;
use image::GenericImageView;
use rand::thread_rng;
use rand::Rng;

use crate::dataset::Sample;
use crate::transform::FlowTransform;

type GridResult<T> = flowkit_core::Result<T>;

/// Negate one channel of an optional `[2, H, W]` flow.
fn negate_channel(flow: &mut Option<Grid<f32>>, c: usize) -> GridResult<()> {
    if let Some(f) = flow.as_mut() {
        for v in f.channel_mut(c)? {
            *v = -*v;
        }
    }
    Ok(())
}

fn map_opt<T>(g: &Option<T>, f: impl FnOnce(&T) -> GridResult<T>) -> GridResult<Option<T>> {
    g.as_ref().map(f).transpose()
}

// RandomHorizontalFlip

/// Randomly flip a sample left-right with probability `p`.
#[derive(Debug, Clone)]
pub struct RandomHorizontalFlip {
    pub p: f64,
}

impl RandomHorizontalFlip {
    pub fn new(p: f64) -> Self {
        Self { p }
    }

    fn flip(sample: &Sample) -> GridResult<Sample> {
        let mut flow = map_opt(&sample.flow, Grid::flip_horizontal)?;
        negate_channel(&mut flow, 0)?;
        Ok(Sample {
            img1: sample.img1.fliph(),
            img2: sample.img2.fliph(),
            flow,
            valid: map_opt(&sample.valid, Grid::flip_horizontal)?,
        })
    }
}

impl FlowTransform for RandomHorizontalFlip {
    fn apply(&self, sample: Sample) -> Sample {
        let mut rng = thread_rng();
        if rng.gen::<f64>() >= self.p {
            return sample;
        }
        match Self::flip(&sample) {
            Ok(flipped) => flipped,
            Err(e) => {
                log::warn!("RandomHorizontalFlip skipped: {e}");
                sample
            }
        }
    }
}

// RandomVerticalFlip

/// Randomly flip a sample top-bottom with probability `p`.
#[derive(Debug, Clone)]
pub struct RandomVerticalFlip {
    pub p: f64,
}

impl RandomVerticalFlip {
    pub fn new(p: f64) -> Self {
        Self { p }
    }

    fn flip(sample: &Sample) -> GridResult<Sample> {
        let mut flow = map_opt(&sample.flow, Grid::flip_vertical)?;
        negate_channel(&mut flow, 1)?;
        Ok(Sample {
            img1: sample.img1.flipv(),
            img2: sample.img2.flipv(),
            flow,
            valid: map_opt(&sample.valid, Grid::flip_vertical)?,
        })
    }
}

impl FlowTransform for RandomVerticalFlip {
    fn apply(&self, sample: Sample) -> Sample {
        let mut rng = thread_rng();
        if rng.gen::<f64>() >= self.p {
            return sample;
        }
        match Self::flip(&sample) {
            Ok(flipped) => flipped,
            Err(e) => {
                log::warn!("RandomVerticalFlip skipped: {e}");
                sample
            }
        }
    }
}

// RandomCrop

/// Crop a random `[crop_h, crop_w]` window, the same for frames, flow and mask.
///
/// Samples smaller than the window are returned unchanged. Flow values are
/// translation invariant, so no value adjustment is needed.
#[derive(Debug, Clone)]
pub struct RandomCrop {
    pub crop_h: usize,
    pub crop_w: usize,
}

impl RandomCrop {
    pub fn new(crop_h: usize, crop_w: usize) -> Self {
        Self { crop_h, crop_w }
    }

    fn crop(&self, sample: &Sample, top: usize, left: usize) -> GridResult<Sample> {
        let (h, w) = (self.crop_h, self.crop_w);
        Ok(Sample {
            img1: sample.img1.crop_imm(left as u32, top as u32, w as u32, h as u32),
            img2: sample.img2.crop_imm(left as u32, top as u32, w as u32, h as u32),
            flow: map_opt(&sample.flow, |g| g.crop(top, left, h, w))?,
            valid: map_opt(&sample.valid, |g| g.crop(top, left, h, w))?,
        })
    }
}

impl FlowTransform for RandomCrop {
    fn apply(&self, sample: Sample) -> Sample {
        let (w, h) = sample.img1.dimensions();
        let (w, h) = (w as usize, h as usize);
        if h < self.crop_h || w < self.crop_w {
            return sample;
        }

        let mut rng = thread_rng();
        let top = rng.gen_range(0..=h - self.crop_h);
        let left = rng.gen_range(0..=w - self.crop_w);
        match self.crop(&sample, top, left) {
            Ok(cropped) => cropped,
            Err(e) => {
                log::warn!("RandomCrop skipped: {e}");
                sample
            }
        }
    }
}
