use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::network::spec::NetworkSpec;

/// Pre-activation and activation columns of one layer for a single input.
#[derive(Debug, Clone)]
pub struct LayerTrace {
    pub pre_activation: Matrix,
    pub activation: Matrix,
}

/// Feed-forward sigmoid network.
///
/// `layers[i]` for `i < hidden_layer_sizes.len()` are the hidden layers; the
/// last entry is the output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub input_size: usize,
    pub output_size: usize,
    pub hidden_layer_sizes: Vec<usize>,
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a randomly initialized network. Fails on an empty hidden list or
    /// a zero-sized layer.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        hidden_layer_sizes: &[usize],
        rng: &mut R,
    ) -> Result<Network> {
        check_topology(input_size, output_size, hidden_layer_sizes)?;

        let mut layers = Vec::with_capacity(hidden_layer_sizes.len() + 1);
        let mut fan_in = input_size;
        for &size in hidden_layer_sizes.iter().chain(std::iter::once(&output_size)) {
            layers.push(Layer::new(size, fan_in, rng));
            fan_in = size;
        }

        Ok(Network {
            input_size,
            output_size,
            hidden_layer_sizes: hidden_layer_sizes.to_vec(),
            layers,
        })
    }

    /// Builds a network from explicit per-layer parameters, checking every
    /// dimension against the declared topology.
    pub fn from_parameters(
        input_size: usize,
        output_size: usize,
        hidden_layer_sizes: &[usize],
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
    ) -> Result<Network> {
        check_topology(input_size, output_size, hidden_layer_sizes)?;

        if weights.len() != biases.len() {
            return Err(NetError::InvalidTopology(format!(
                "{} weight matrices but {} bias vectors",
                weights.len(),
                biases.len()
            )));
        }

        let layers = weights
            .into_iter()
            .zip(biases)
            .map(|(w, b)| Layer::from_parameters(w, b))
            .collect::<Result<Vec<_>>>()?;

        let network = Network {
            input_size,
            output_size,
            hidden_layer_sizes: hidden_layer_sizes.to_vec(),
            layers,
        };
        network.validate()?;
        Ok(network)
    }

    /// Same topology, fresh random parameters.
    pub fn reinitialized<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let mut layers = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            layers.push(Layer::new(layer.size, layer.input_size, rng));
        }

        Network {
            input_size: self.input_size,
            output_size: self.output_size,
            hidden_layer_sizes: self.hidden_layer_sizes.clone(),
            layers,
        }
    }

    /// Checks that the layers chain together and match the declared sizes.
    pub fn validate(&self) -> Result<()> {
        check_topology(self.input_size, self.output_size, &self.hidden_layer_sizes)?;

        let expected = self.layer_sizes();
        if self.layers.len() != expected.len() {
            return Err(NetError::InvalidTopology(format!(
                "expected {} layers, found {}",
                expected.len(),
                self.layers.len()
            )));
        }

        let mut fan_in = self.input_size;
        for (i, (layer, &size)) in self.layers.iter().zip(expected.iter()).enumerate() {
            if layer.weights.dims() != (size, fan_in) {
                return Err(NetError::InvalidTopology(format!(
                    "layer {} weights are {:?}, expected {:?}",
                    i,
                    layer.weights.dims(),
                    (size, fan_in)
                )));
            }
            if layer.biases.dims() != (size, 1) {
                return Err(NetError::InvalidTopology(format!(
                    "layer {} biases are {:?}, expected {:?}",
                    i,
                    layer.biases.dims(),
                    (size, 1)
                )));
            }
            if layer.size != size || layer.input_size != fan_in {
                return Err(NetError::InvalidTopology(format!(
                    "layer {} declares {}×{}, expected {}×{}",
                    i, layer.size, layer.input_size, size, fan_in
                )));
            }
            fan_in = size;
        }

        Ok(())
    }

    /// Forward pass. Pure: no state is kept between calls.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;

        let mut current = Matrix::column(input);
        for layer in &self.layers {
            current = layer.feed_from(&current)?;
        }
        Ok(current.column_values())
    }

    /// Forward pass that keeps every layer's `z` and `a`.
    pub fn forward_trace(&self, input: &[f64]) -> Result<Vec<LayerTrace>> {
        self.check_input(input)?;

        let mut traces: Vec<LayerTrace> = Vec::with_capacity(self.layers.len());
        let mut current = Matrix::column(input);
        for layer in &self.layers {
            let pre_activation = layer.pre_activation(&current)?;
            let activation = pre_activation.sigmoid();
            current = activation.clone();
            traces.push(LayerTrace { pre_activation, activation });
        }
        Ok(traces)
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.hidden_layer_sizes.len()
    }

    /// Hidden layer sizes followed by the output size.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = self.hidden_layer_sizes.clone();
        sizes.push(self.output_size);
        sizes
    }

    pub fn weight_count(&self) -> usize {
        self.layers.iter().map(|l| l.size * l.input_size).sum()
    }

    pub fn bias_count(&self) -> usize {
        self.layers.iter().map(|l| l.size).sum()
    }

    pub fn weights(&self) -> impl Iterator<Item = &Matrix> {
        self.layers.iter().map(|l| &l.weights)
    }

    pub fn biases(&self) -> impl Iterator<Item = &Matrix> {
        self.layers.iter().map(|l| &l.biases)
    }

    pub fn spec(&self) -> NetworkSpec {
        NetworkSpec {
            input_size: self.input_size,
            output_size: self.output_size,
            hidden_layers: self.hidden_layer_sizes.clone(),
        }
    }

    /// Serializes the network parameters to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`
    /// and re-checks its dimensions.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        Ok(network)
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size {
            return Err(NetError::InputSizeMismatch {
                expected: self.input_size,
                actual: input.len(),
            });
        }
        Ok(())
    }
}

pub(crate) fn check_topology(input_size: usize, output_size: usize, hidden: &[usize]) -> Result<()> {
    if hidden.is_empty() {
        return Err(NetError::EmptyHiddenLayers);
    }
    if input_size == 0 || output_size == 0 || hidden.contains(&0) {
        return Err(NetError::InvalidTopology(
            "layer sizes must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_hidden_layers_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            Network::new(3, 2, &[], &mut rng).unwrap_err(),
            NetError::EmptyHiddenLayers
        );
    }

    #[test]
    fn test_random_network_shapes() {
        let mut rng = StdRng::seed_from_u64(0);
        let net = Network::new(3, 2, &[2, 4], &mut rng).unwrap();

        let dims: Vec<_> = net.weights().map(|w| w.dims()).collect();
        assert_eq!(dims, vec![(2, 3), (4, 2), (2, 4)]);
        assert_eq!(net.weight_count(), 22);
        assert_eq!(net.bias_count(), 8);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn test_from_parameters_rejects_wrong_chain() {
        let weights = vec![Matrix::zeros(2, 3), Matrix::zeros(2, 3)];
        let biases = vec![Matrix::zeros(2, 1), Matrix::zeros(2, 1)];
        assert!(matches!(
            Network::from_parameters(3, 2, &[2], weights, biases),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_from_parameters_rejects_layer_count_mismatch() {
        let weights = vec![Matrix::zeros(2, 3), Matrix::zeros(2, 2)];
        let biases = vec![Matrix::zeros(2, 1)];
        assert!(matches!(
            Network::from_parameters(3, 2, &[2], weights, biases),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_forward_rejects_wrong_input_length() {
        let mut rng = StdRng::seed_from_u64(0);
        let net = Network::new(3, 2, &[2], &mut rng).unwrap();
        assert_eq!(
            net.forward(&[1.0]).unwrap_err(),
            NetError::InputSizeMismatch { expected: 3, actual: 1 }
        );
    }

    #[test]
    fn test_forward_trace_ends_with_forward_output() {
        let mut rng = StdRng::seed_from_u64(3);
        let net = Network::new(3, 2, &[4, 3], &mut rng).unwrap();
        let input = [0.2, -0.4, 1.0];

        let trace = net.forward_trace(&input).unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace[2].activation.column_values(), net.forward(&input).unwrap());
    }

    #[test]
    fn test_reinitialized_keeps_topology() {
        let mut rng = StdRng::seed_from_u64(9);
        let net = Network::new(5, 3, &[4], &mut rng).unwrap();
        let fresh = net.reinitialized(&mut rng);

        assert_eq!(fresh.spec(), net.spec());
        assert_ne!(fresh.layers[0].weights, net.layers[0].weights);
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let mut rng = StdRng::seed_from_u64(11);
        let net = Network::new(2, 1, &[3], &mut rng).unwrap();
        let path = std::env::temp_dir().join("jacobian_nn_network_test.json");
        let path = path.to_str().unwrap();

        net.save_json(path).unwrap();
        let loaded = Network::load_json(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded.spec(), net.spec());
        for (a, b) in loaded.layers.iter().zip(net.layers.iter()) {
            for (x, y) in a.weights.flatten().iter().zip(b.weights.flatten().iter()) {
                assert!((x - y).abs() < 1e-12);
            }
        }
    }
}
