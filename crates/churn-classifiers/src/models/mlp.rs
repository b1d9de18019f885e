//! Small feed-forward network trained with candle.
//!
//! ReLU hidden layers and a single logit output, trained on shuffled
//! mini-batches with AdamW and binary cross-entropy. Weights are initialised
//! from the model seed so training is reproducible on the CPU device.

use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{AdamW, Linear, Module, Optimizer, ParamsAdamW};
use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::{ModelConfig, ModelType};
use crate::error::{ChurnError, Result};
use crate::models::classifier_trait::ChurnClassifier;

const NAME: &str = "MLPClassifier";

fn candle_err(e: candle_core::Error) -> ChurnError {
    ChurnError::model_fit(NAME, e)
}

struct Network {
    layers: Vec<Linear>,
}

impl Network {
    /// Glorot-uniform weights and biases for each `(fan_in, fan_out)` pair.
    fn init(
        sizes: &[usize],
        rng: &mut StdRng,
        device: &Device,
    ) -> candle_core::Result<(Self, Vec<Var>)> {
        let mut layers = Vec::with_capacity(sizes.len().saturating_sub(1));
        let mut vars = Vec::with_capacity(2 * layers.capacity());

        for pair in sizes.windows(2) {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let bound = (6.0 / (fan_in + fan_out) as f64).sqrt() as f32;
            let dist = Uniform::new_inclusive(-bound, bound);

            let w: Vec<f32> = (0..fan_in * fan_out).map(|_| dist.sample(rng)).collect();
            let b: Vec<f32> = (0..fan_out).map(|_| dist.sample(rng)).collect();

            let w = Var::from_tensor(&Tensor::from_vec(w, (fan_out, fan_in), device)?)?;
            let b = Var::from_tensor(&Tensor::from_vec(b, fan_out, device)?)?;

            layers.push(Linear::new(w.as_tensor().clone(), Some(b.as_tensor().clone())));
            vars.push(w);
            vars.push(b);
        }

        Ok((Network { layers }, vars))
    }

    /// Raw logits, shape `(n, 1)`.
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let mut h = x.clone();
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            h = layer.forward(&h)?;
            if i < last {
                h = h.relu()?;
            }
        }
        Ok(h)
    }
}

pub struct MLPClassifier {
    network: Option<Network>,
    device: Device,
    params: ModelConfig,
    n_epochs_run: usize,
}

impl MLPClassifier {
    pub fn new(params: ModelConfig) -> Self {
        MLPClassifier {
            network: None,
            device: Device::Cpu,
            params,
            n_epochs_run: 0,
        }
    }

    /// Epochs actually run by the last fit (early stopping may cut it short).
    pub fn n_epochs_run(&self) -> usize {
        self.n_epochs_run
    }

    fn to_tensor(&self, x: &Array2<f64>) -> candle_core::Result<Tensor> {
        let data: Vec<f32> = x.iter().map(|&v| v as f32).collect();
        Tensor::from_vec(data, (x.nrows(), x.ncols()), &self.device)
    }
}

impl ChurnClassifier for MLPClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ChurnError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ChurnError::EmptyDataset);
        }

        let ModelType::NeuralNetwork {
            hidden_layer_sizes,
            max_epochs,
            batch_size,
            alpha,
            tol,
            n_iter_no_change,
        } = &self.params.model_type
        else {
            return Err(ChurnError::model_fit(
                NAME,
                format!(
                    "expected ModelType::NeuralNetwork params, got {:?}",
                    self.params.model_type
                ),
            ));
        };

        let n = x.nrows();
        let batch_size = (*batch_size).clamp(1, n);

        let mut sizes = Vec::with_capacity(hidden_layer_sizes.len() + 2);
        sizes.push(x.ncols());
        sizes.extend_from_slice(hidden_layer_sizes);
        sizes.push(1);

        let mut rng = StdRng::seed_from_u64(self.params.random_state);
        let (network, vars) = Network::init(&sizes, &mut rng, &self.device).map_err(candle_err)?;

        let opt_params = ParamsAdamW {
            lr: self.params.learning_rate as f64,
            weight_decay: *alpha,
            ..Default::default()
        };
        let mut opt = AdamW::new(vars, opt_params).map_err(candle_err)?;

        let x_all = self.to_tensor(x).map_err(candle_err)?;
        let y_all = Tensor::from_vec(
            y.iter().map(|&v| v as f32).collect::<Vec<f32>>(),
            (n, 1),
            &self.device,
        )
        .map_err(candle_err)?;

        let mut order: Vec<u32> = (0..n as u32).collect();
        let mut best_loss = f32::INFINITY;
        let mut epochs_without_improvement = 0;
        let mut epochs_run = 0;

        for epoch in 0..*max_epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0f32;

            for chunk in order.chunks(batch_size) {
                let idx = Tensor::from_slice(chunk, chunk.len(), &self.device)
                    .map_err(candle_err)?;
                let xb = x_all.index_select(&idx, 0).map_err(candle_err)?;
                let yb = y_all.index_select(&idx, 0).map_err(candle_err)?;

                let logits = network.forward(&xb).map_err(candle_err)?;
                let loss = candle_nn::loss::binary_cross_entropy_with_logit(&logits, &yb)
                    .map_err(candle_err)?;
                opt.backward_step(&loss).map_err(candle_err)?;

                let batch_loss = loss
                    .to_dtype(DType::F32)
                    .and_then(|l| l.to_scalar::<f32>())
                    .map_err(candle_err)?;
                epoch_loss += batch_loss * chunk.len() as f32;
            }

            epoch_loss /= n as f32;
            epochs_run = epoch + 1;
            log::trace!("{}: epoch {} loss {:.6}", NAME, epoch, epoch_loss);

            if !epoch_loss.is_finite() {
                return Err(ChurnError::model_fit(
                    NAME,
                    format!("loss diverged at epoch {}", epoch),
                ));
            }

            if epoch_loss > best_loss - *tol as f32 {
                epochs_without_improvement += 1;
            } else {
                epochs_without_improvement = 0;
            }
            best_loss = best_loss.min(epoch_loss);

            if epochs_without_improvement >= *n_iter_no_change {
                log::debug!(
                    "{}: loss did not improve by more than {} for {} epochs, stopping at epoch {}",
                    NAME,
                    tol,
                    n_iter_no_change,
                    epochs_run
                );
                break;
            }
        }

        self.n_epochs_run = epochs_run;
        self.network = Some(network);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let network = self
            .network
            .as_ref()
            .ok_or_else(|| ChurnError::NotFitted(NAME.to_string()))?;
        let inputs = self.to_tensor(x).map_err(candle_err)?;
        let logits = network
            .forward(&inputs)
            .and_then(|t| t.flatten_all())
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(candle_err)?;
        Ok(logits.into_iter().map(|l| if l > 0.0 { 1 } else { 0 }).collect())
    }

    fn name(&self) -> &str {
        NAME
    }
}
