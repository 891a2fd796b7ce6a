// The digit classifier: a small CNN in the MNIST input format.
//
// Training happens elsewhere; this binary only defines the architecture
// (burn needs it in code to deserialize a checkpoint) and loads the trained
// weights once at startup.

use std::path::Path;

use burn::{
    config::Config,
    module::Module,
    nn::{
        Dropout, DropoutConfig, Linear, LinearConfig, Relu,
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
    },
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::{Tensor, backend::Backend},
};

use crate::error::Error;

#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    pool: MaxPool2d,
    dropout: Dropout,
    fc1: Linear<B>,
    fc2: Linear<B>,
    activation: Relu,
}

#[derive(Config, Debug)]
pub struct ModelConfig {
    #[config(default = 10)]
    pub num_classes: usize,
    #[config(default = 128)]
    pub hidden_size: usize,
    #[config(default = "0.5")]
    pub dropout: f64,
}

impl ModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        Model {
            conv1: Conv2dConfig::new([1, 8], [3, 3]).init(device),
            conv2: Conv2dConfig::new([8, 16], [3, 3]).init(device),
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            dropout: DropoutConfig::new(self.dropout).init(),
            // 28 -> 26 -> 24 after the two valid convolutions, 12 after pooling
            fc1: LinearConfig::new(16 * 12 * 12, self.hidden_size).init(device),
            fc2: LinearConfig::new(self.hidden_size, self.num_classes).init(device),
            activation: Relu::new(),
        }
    }
}

impl<B: Backend> Model<B> {
    /// Forward pass over a [batch, 1, 28, 28] image batch, returning raw
    /// logits of shape [batch, 10]. Softmax is the caller's business.
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(images);
        let x = self.activation.forward(x);
        let x = self.conv2.forward(x);
        let x = self.activation.forward(x);
        let x = self.pool.forward(x);
        let x = self.dropout.forward(x);
        let x = x.flatten::<2>(1, 3);
        let x = self.fc1.forward(x);
        let x = self.activation.forward(x);
        self.fc2.forward(x)
    }
}

/// Load the trained weights from a named-MessagePack checkpoint.
/// Missing or corrupt artifacts fail here, before any window is shown.
pub fn load_from_file<B: Backend>(path: &Path, device: &B::Device) -> Result<Model<B>, Error> {
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .map_err(|source| Error::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ModelConfig::new().init(device).load_record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn forward_maps_one_image_to_ten_logits() {
        let device = Default::default();
        let model: Model<NdArray<f32>> = ModelConfig::new().init(&device);
        let input = Tensor::zeros([1, 1, 28, 28], &device);
        let output = model.forward(input);
        assert_eq!(output.dims(), [1, 10]);
    }
}
