// The narrow seam between the interactive loop and the deep-learning stack.
//
// Everything upstream talks to the `Classifier` trait only, so the session
// and the normalizer test against stubs and never touch burn.

use std::path::Path;

use burn::{
    backend::{NdArray, ndarray::NdArrayDevice},
    tensor::{Tensor, TensorData, activation::softmax},
};

use crate::error::Error;
use crate::model::{self, Model};
use crate::normalize::{CLASSIFIER_SIDE, NormalizedImage};

pub const DIGIT_CLASSES: usize = 10;

/// Display names for the ten digit classes, indexed by class.
pub const DIGIT_NAMES: [&str; DIGIT_CLASSES] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

/// One blocking classification call: normalized image in, probability
/// distribution over the ten digits out.
pub trait Classifier {
    fn classify(&self, image: &NormalizedImage) -> Result<[f32; DIGIT_CLASSES], Error>;
}

/// The winning class with its display name and probability.
#[derive(Clone, Copy, Debug)]
pub struct Prediction {
    pub class: usize,
    pub label: &'static str,
    pub confidence: f32,
}

/// Classify `image` and reduce the distribution to its argmax label.
pub fn predict<C: Classifier + ?Sized>(
    classifier: &C,
    image: &NormalizedImage,
) -> Result<Prediction, Error> {
    let probs = classifier.classify(image)?;
    let (class, confidence) = argmax(&probs);
    Ok(Prediction {
        class,
        label: DIGIT_NAMES[class],
        confidence,
    })
}

fn argmax(probs: &[f32; DIGIT_CLASSES]) -> (usize, f32) {
    let mut best = 0;
    for (i, &p) in probs.iter().enumerate() {
        if p > probs[best] {
            best = i;
        }
    }
    (best, probs[best])
}

/// The real classifier: the burn CNN on the CPU ndarray backend.
pub struct DigitClassifier {
    model: Model<NdArray<f32>>,
    device: NdArrayDevice,
}

impl DigitClassifier {
    /// Load the checkpoint once at startup. Fails fast when the artifact is
    /// missing so the window never opens half-initialized.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let device = NdArrayDevice::default();
        let model = model::load_from_file(path, &device)?;
        Ok(Self { model, device })
    }
}

impl Classifier for DigitClassifier {
    fn classify(&self, image: &NormalizedImage) -> Result<[f32; DIGIT_CLASSES], Error> {
        let side = CLASSIFIER_SIDE as usize;
        if image.len() != side * side {
            return Err(Error::Inference(format!(
                "input has {} pixels, expected {}",
                image.len(),
                side * side
            )));
        }

        let data = TensorData::new(image.as_slice().to_vec(), [1, 1, side, side]);
        let input = Tensor::<NdArray<f32>, 4>::from_data(data, &self.device);

        let logits = self.model.forward(input);
        let probs = softmax(logits, 1);
        let values = probs
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| Error::Inference(format!("failed to read output tensor: {e:?}")))?;
        if values.len() != DIGIT_CLASSES {
            return Err(Error::Inference(format!(
                "output has {} classes, expected {DIGIT_CLASSES}",
                values.len()
            )));
        }

        let mut out = [0.0; DIGIT_CLASSES];
        out.copy_from_slice(&values);
        Ok(out)
    }
}
