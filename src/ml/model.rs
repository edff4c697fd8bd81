//! The feedforward cheat-probability network (spec section 4.6): 12 named
//! features in, a single sigmoid probability out. Two backends share this
//! definition — `TrainBackend` for gradient descent, `InferenceBackend` for
//! the shadow-mode predictions served on every submission.

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Linear, LinearConfig, Relu};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::model::FEATURE_COUNT;

pub type InferenceBackend = burn_ndarray::NdArray<f32>;
pub type TrainBackend = burn_autodiff::Autodiff<InferenceBackend>;

#[derive(Config, Debug)]
pub struct CheatNetConfig {
    #[config(default = 32)]
    pub hidden_1: usize,
    #[config(default = 16)]
    pub hidden_2: usize,
}

impl CheatNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CheatNet<B> {
        CheatNet {
            fc1: LinearConfig::new(FEATURE_COUNT, self.hidden_1).init(device),
            fc2: LinearConfig::new(self.hidden_1, self.hidden_2).init(device),
            fc3: LinearConfig::new(self.hidden_2, 1).init(device),
            relu: Relu::new(),
        }
    }
}

/// Dense 12-32-16-1 classifier. `forward` returns raw logits; callers apply
/// sigmoid explicitly so the training loop can use a logits-based loss.
#[derive(Module, Debug)]
pub struct CheatNet<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
    relu: Relu,
}

impl<B: Backend> CheatNet<B> {
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.fc1.forward(input);
        let x = self.relu.forward(x);
        let x = self.fc2.forward(x);
        let x = self.relu.forward(x);
        self.fc3.forward(x)
    }

    pub fn predict_probability(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        burn::tensor::activation::sigmoid(self.forward(input))
    }
}
