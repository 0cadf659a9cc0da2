// Transform - per-sample preprocessing / augmentation hook

use crate::dataset::Sample;

/// A transform applied to each sample after decoding.
///
/// It sees the whole `(img1, img2, flow, valid)` sample and returns a
/// replacement; nothing constrains what it changes.
pub trait FlowTransform: Send + Sync {
    /// Apply the transform to a sample, returning the modified sample.
    fn apply(&self, sample: Sample) -> Sample;
}

impl<F> FlowTransform for F
where
    F: Fn(Sample) -> Sample + Send + Sync,
{
    fn apply(&self, sample: Sample) -> Sample {
        self(sample)
    }
}

/// Chain multiple transforms.
pub struct Compose {
    transforms: Vec<Box<dyn FlowTransform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn FlowTransform>>) -> Self {
        Self { transforms }
    }
}

impl FlowTransform for Compose {
    fn apply(&self, mut sample: Sample) -> Sample {
        for t in &self.transforms {
            sample = t.apply(sample);
        }
        sample
    }
}

/// Scale the flow field by a constant, e.g. to match a resized image.
#[derive(Debug, Clone)]
pub struct ScaleFlow {
    pub factor: f32,
}

impl ScaleFlow {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }
}

impl FlowTransform for ScaleFlow {
    fn apply(&self, mut sample: Sample) -> Sample {
        if let Some(flow) = sample.flow.as_mut() {
            for v in flow.as_mut_slice() {
                *v *= self.factor;
            }
        }
        sample
    }
}
