use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::network::{check_topology, Network};

/// Topology of a network, independent of its trained parameters.
///
/// Can be stored as JSON before training starts and turned into a freshly
/// initialized `Network` with `build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub output_size: usize,
    /// Hidden layer sizes, input side first. Must not be empty.
    pub hidden_layers: Vec<usize>,
}

impl NetworkSpec {
    pub fn new(input_size: usize, output_size: usize, hidden_layers: Vec<usize>) -> Result<NetworkSpec> {
        check_topology(input_size, output_size, &hidden_layers)?;
        Ok(NetworkSpec { input_size, output_size, hidden_layers })
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::new(self.input_size, self.output_size, &self.hidden_layers, rng)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        check_topology(spec.input_size, spec.output_size, &spec.hidden_layers)?;
        Ok(spec)
    }
}
