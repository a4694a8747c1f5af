// ============================================================
// Layer 6 - Deployment Bundle Exporter
// ============================================================
// Converts a fitted model into the bundle the client-side
// calculator application loads, and can read such a bundle
// back for prediction.
//
// Bundle layout (one directory per model):
//   sum_model/
//     model.json            - topology + weights manifest
//     group1-shard1of1.bin  - little-endian f32 weight values,
//                             concatenated in manifest order
//
// model.json is a layers-model description: a Sequential stack
// of Dense layers plus a weightsManifest that names each
// kernel/bias tensor, its shape and its dtype. The shard holds
// the raw values in exactly the manifest's order, so the total
// byte length of every shard is fully determined by the
// manifest. Validation exploits that:
//
//   validate_bundle() confirms the manifest parses and every
//   shard file exists with the exact byte length the manifest
//   implies. The caller must not delete the interchange
//   artifact until this check has passed.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{fs, path::Path};

/// File names inside every bundle directory.
pub const MODEL_JSON: &str = "model.json";
pub const WEIGHTS_SHARD: &str = "group1-shard1of1.bin";

const BUNDLE_FORMAT: &str = "layers-model";
const DTYPE_F32: &str = "float32";

/// Activation applied after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply(&self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Linear => x,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Linear => "linear",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "relu" => Ok(Activation::Relu),
            "linear" => Ok(Activation::Linear),
            other => bail!("unsupported activation '{other}' in bundle topology"),
        }
    }
}

/// One dense layer's parameters, extracted from the model.
/// The kernel is [input_dim, units] row-major, matching both
/// Burn's Linear layout and the bundle's expectation.
#[derive(Debug, Clone)]
pub struct LayerWeights {
    pub name: String,
    pub kernel: Vec<f32>,
    pub bias: Vec<f32>,
    pub input_dim: usize,
    pub units: usize,
    pub activation: Activation,
}

// ─── Manifest types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct WeightSpec {
    name: String,
    shape: Vec<usize>,
    dtype: String,
}

impl WeightSpec {
    fn byte_len(&self) -> usize {
        self.shape.iter().product::<usize>() * 4
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WeightsGroup {
    paths: Vec<String>,
    weights: Vec<WeightSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelJson {
    format: String,
    generated_by: String,
    converted_by: String,
    model_topology: serde_json::Value,
    weights_manifest: Vec<WeightsGroup>,
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// Write the deployment bundle for one model into `dir`.
///
/// The layers must form a consistent chain (each layer's input
/// width equal to the previous layer's output width) with
/// kernel/bias lengths matching their declared dimensions;
/// anything else is a conversion error before a byte is written.
pub fn export_bundle(layers: &[LayerWeights], model_name: &str, dir: &Path) -> Result<()> {
    check_layer_chain(layers)?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create bundle directory '{}'", dir.display()))?;

    let tool = format!("arith-ops-trainer {}", env!("CARGO_PKG_VERSION"));

    // ── Manifest + shard, in lockstep ─────────────────────────────────────────
    // Every manifest entry is immediately followed by its bytes
    // being appended, so order can never drift between the two.
    let mut specs = Vec::new();
    let mut shard: Vec<u8> = Vec::new();
    for layer in layers {
        specs.push(WeightSpec {
            name: format!("{}/kernel", layer.name),
            shape: vec![layer.input_dim, layer.units],
            dtype: DTYPE_F32.to_string(),
        });
        for value in &layer.kernel {
            shard.extend_from_slice(&value.to_le_bytes());
        }

        specs.push(WeightSpec {
            name: format!("{}/bias", layer.name),
            shape: vec![layer.units],
            dtype: DTYPE_F32.to_string(),
        });
        for value in &layer.bias {
            shard.extend_from_slice(&value.to_le_bytes());
        }
    }

    let manifest = ModelJson {
        format: BUNDLE_FORMAT.to_string(),
        generated_by: tool.clone(),
        converted_by: tool,
        model_topology: topology_json(layers, model_name),
        weights_manifest: vec![WeightsGroup {
            paths: vec![WEIGHTS_SHARD.to_string()],
            weights: specs,
        }],
    };

    let json_path = dir.join(MODEL_JSON);
    fs::write(&json_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Cannot write '{}'", json_path.display()))?;

    let shard_path = dir.join(WEIGHTS_SHARD);
    fs::write(&shard_path, &shard)
        .with_context(|| format!("Cannot write '{}'", shard_path.display()))?;

    tracing::info!(
        "Wrote bundle '{}' ({} weight tensors, {} bytes)",
        dir.display(),
        2 * layers.len(),
        shard.len(),
    );
    Ok(())
}

fn check_layer_chain(layers: &[LayerWeights]) -> Result<()> {
    if layers.is_empty() {
        bail!("cannot export a model with no layers");
    }
    let mut prev_units = None;
    for layer in layers {
        if layer.kernel.len() != layer.input_dim * layer.units {
            bail!(
                "layer '{}': kernel has {} values, expected {}x{}",
                layer.name,
                layer.kernel.len(),
                layer.input_dim,
                layer.units
            );
        }
        if layer.bias.len() != layer.units {
            bail!(
                "layer '{}': bias has {} values, expected {}",
                layer.name,
                layer.bias.len(),
                layer.units
            );
        }
        if let Some(prev) = prev_units {
            if layer.input_dim != prev {
                bail!(
                    "layer '{}': input width {} does not match previous output width {}",
                    layer.name,
                    layer.input_dim,
                    prev
                );
            }
        }
        prev_units = Some(layer.units);
    }
    Ok(())
}

/// The Sequential topology description the client runtime reads.
fn topology_json(layers: &[LayerWeights], model_name: &str) -> serde_json::Value {
    let input_dim = layers[0].input_dim;

    let mut layer_descs = vec![json!({
        "class_name": "InputLayer",
        "config": {
            "batch_input_shape": [null, input_dim],
            "dtype": DTYPE_F32,
            "name": "input_pair",
        },
    })];
    for layer in layers {
        layer_descs.push(json!({
            "class_name": "Dense",
            "config": {
                "name": layer.name,
                "units": layer.units,
                "activation": layer.activation.as_str(),
                "use_bias": true,
                "dtype": DTYPE_F32,
            },
        }));
    }

    json!({
        "keras_version": "2.15.0",
        "backend": "tensorflow",
        "model_config": {
            "class_name": "Sequential",
            "config": {
                "name": model_name,
                "layers": layer_descs,
            },
        },
    })
}

// ─── Validation ───────────────────────────────────────────────────────────────

/// Structural validation of a bundle directory: the manifest
/// must parse, declare the expected format, and every shard it
/// names must exist with exactly the byte length the declared
/// shapes imply. Does not touch the weight values themselves.
pub fn validate_bundle(dir: &Path) -> Result<()> {
    let manifest = read_manifest(dir)?;

    let mut total_tensors = 0usize;
    for group in &manifest.weights_manifest {
        for spec in &group.weights {
            if spec.dtype != DTYPE_F32 {
                bail!("weight '{}' has unsupported dtype '{}'", spec.name, spec.dtype);
            }
        }
        total_tensors += group.weights.len();

        let expected: usize = group.weights.iter().map(WeightSpec::byte_len).sum();
        let mut actual = 0u64;
        for path in &group.paths {
            let shard_path = dir.join(path);
            let meta = fs::metadata(&shard_path)
                .with_context(|| format!("missing weight shard '{}'", shard_path.display()))?;
            actual += meta.len();
        }
        if actual != expected as u64 {
            bail!(
                "weight shards hold {} bytes but the manifest implies {}",
                actual,
                expected
            );
        }
    }

    if total_tensors == 0 {
        bail!("bundle manifest declares no weight tensors");
    }
    Ok(())
}

fn read_manifest(dir: &Path) -> Result<ModelJson> {
    let json_path = dir.join(MODEL_JSON);
    let text = fs::read_to_string(&json_path)
        .with_context(|| format!("missing bundle manifest '{}'", json_path.display()))?;
    let manifest: ModelJson = serde_json::from_str(&text)
        .with_context(|| format!("malformed bundle manifest '{}'", json_path.display()))?;

    if manifest.format != BUNDLE_FORMAT {
        bail!(
            "bundle format is '{}', expected '{}'",
            manifest.format,
            BUNDLE_FORMAT
        );
    }
    Ok(manifest)
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// A bundle read back into memory, with a plain forward pass.
/// This is what the `predict` command runs, and what the
/// round-trip fidelity check compares against the live model.
pub struct BundleModel {
    layers: Vec<LayerWeights>,
}

impl BundleModel {
    /// Load and fully check a bundle directory.
    pub fn load(dir: &Path) -> Result<Self> {
        validate_bundle(dir)?;
        let manifest = read_manifest(dir)?;
        let activations = dense_activations(&manifest.model_topology)?;

        // Concatenate shard bytes in manifest order
        let mut bytes = Vec::new();
        for group in &manifest.weights_manifest {
            for path in &group.paths {
                let shard_path = dir.join(path);
                let shard = fs::read(&shard_path)
                    .with_context(|| format!("cannot read shard '{}'", shard_path.display()))?;
                bytes.extend_from_slice(&shard);
            }
        }

        // Walk the manifest, consuming each tensor's bytes and
        // pairing every kernel with the bias that follows it.
        let mut layers = Vec::new();
        let mut offset = 0usize;
        let specs: Vec<&WeightSpec> = manifest
            .weights_manifest
            .iter()
            .flat_map(|g| g.weights.iter())
            .collect();

        let mut i = 0;
        while i < specs.len() {
            let kernel_spec = specs[i];
            let layer_name = kernel_spec
                .name
                .strip_suffix("/kernel")
                .with_context(|| format!("expected a kernel tensor, found '{}'", kernel_spec.name))?
                .to_string();
            if kernel_spec.shape.len() != 2 {
                bail!("kernel '{}' is not 2-dimensional", kernel_spec.name);
            }

            let bias_spec = specs
                .get(i + 1)
                .with_context(|| format!("kernel '{}' has no bias tensor", kernel_spec.name))?;
            if bias_spec.name != format!("{layer_name}/bias") {
                bail!(
                    "expected bias for layer '{layer_name}', found '{}'",
                    bias_spec.name
                );
            }

            let kernel = take_f32(&bytes, &mut offset, kernel_spec.byte_len())?;
            let bias = take_f32(&bytes, &mut offset, bias_spec.byte_len())?;

            let activation = *activations
                .get(&layer_name)
                .with_context(|| format!("layer '{layer_name}' is missing from the topology"))?;

            layers.push(LayerWeights {
                name: layer_name,
                input_dim: kernel_spec.shape[0],
                units: kernel_spec.shape[1],
                kernel,
                bias,
                activation,
            });
            i += 2;
        }

        Ok(Self { layers })
    }

    /// The input width the first layer expects.
    pub fn input_dim(&self) -> usize {
        self.layers.first().map(|l| l.input_dim).unwrap_or(0)
    }

    /// Plain forward pass over the loaded dense stack.
    pub fn predict(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        if inputs.len() != self.input_dim() {
            bail!(
                "model expects {} inputs, got {}",
                self.input_dim(),
                inputs.len()
            );
        }

        let mut x = inputs.to_vec();
        for layer in &self.layers {
            let mut out = vec![0.0f32; layer.units];
            for (j, out_j) in out.iter_mut().enumerate() {
                let mut acc = layer.bias[j];
                for (i, &x_i) in x.iter().enumerate() {
                    acc += x_i * layer.kernel[i * layer.units + j];
                }
                *out_j = layer.activation.apply(acc);
            }
            x = out;
        }
        Ok(x)
    }

    /// Predict the single output for one operand pair.
    pub fn predict_pair(&self, a: f32, b: f32) -> Result<f32> {
        let out = self.predict(&[a, b])?;
        out.first()
            .copied()
            .context("model produced no output value")
    }
}

fn take_f32(bytes: &[u8], offset: &mut usize, byte_len: usize) -> Result<Vec<f32>> {
    let end = *offset + byte_len;
    if end > bytes.len() {
        bail!("weight shard ended early (validation should have caught this)");
    }
    let values = bytes[*offset..end]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    *offset = end;
    Ok(values)
}

/// Map of Dense layer name → activation, read from the topology.
fn dense_activations(
    topology: &serde_json::Value,
) -> Result<std::collections::HashMap<String, Activation>> {
    let layers = topology
        .pointer("/model_config/config/layers")
        .and_then(|v| v.as_array())
        .context("bundle topology has no layer list")?;

    let mut map = std::collections::HashMap::new();
    for layer in layers {
        if layer.get("class_name").and_then(|v| v.as_str()) != Some("Dense") {
            continue;
        }
        let config = layer.get("config").context("Dense layer without config")?;
        let name = config
            .get("name")
            .and_then(|v| v.as_str())
            .context("Dense layer without a name")?;
        let activation = config
            .get("activation")
            .and_then(|v| v.as_str())
            .context("Dense layer without an activation")?;
        map.insert(name.to_string(), Activation::parse(activation)?);
    }
    Ok(map)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// A hand-built two-layer stack with known arithmetic:
    /// identity hidden layer (relu, harmless on positive input)
    /// followed by a summing output neuron with bias 0.5.
    fn known_layers() -> Vec<LayerWeights> {
        vec![
            LayerWeights {
                name: "hidden_1".to_string(),
                kernel: vec![1.0, 0.0, 0.0, 1.0],
                bias: vec![0.0, 0.0],
                input_dim: 2,
                units: 2,
                activation: Activation::Relu,
            },
            LayerWeights {
                name: "output".to_string(),
                kernel: vec![1.0, 1.0],
                bias: vec![0.5],
                input_dim: 2,
                units: 1,
                activation: Activation::Linear,
            },
        ]
    }

    #[test]
    fn test_export_validate_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("sum_model");

        export_bundle(&known_layers(), "sum_model", &dir).unwrap();
        validate_bundle(&dir).unwrap();

        let model = BundleModel::load(&dir).unwrap();
        assert_eq!(model.input_dim(), 2);
        // 10 + 5 + 0.5 bias
        assert_eq!(model.predict_pair(10.0, 5.0).unwrap(), 15.5);
    }

    #[test]
    fn test_relu_is_applied() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("m");
        export_bundle(&known_layers(), "m", &dir).unwrap();
        let model = BundleModel::load(&dir).unwrap();

        // Negative operands get clipped by the identity+relu
        // hidden layer, so this is NOT -8.0 + 0.5
        let out = model.predict_pair(-5.0, 3.0).unwrap();
        assert_eq!(out, 3.5);
    }

    #[test]
    fn test_missing_manifest_fails_validation() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(validate_bundle(tmp.path()).is_err());
    }

    #[test]
    fn test_truncated_shard_fails_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("m");
        export_bundle(&known_layers(), "m", &dir).unwrap();

        let shard = dir.join(WEIGHTS_SHARD);
        let bytes = fs::read(&shard).unwrap();
        fs::write(&shard, &bytes[..bytes.len() - 4]).unwrap();

        assert!(validate_bundle(&dir).is_err());
        assert!(BundleModel::load(&dir).is_err());
    }

    #[test]
    fn test_oversized_shard_fails_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("m");
        export_bundle(&known_layers(), "m", &dir).unwrap();

        let shard = dir.join(WEIGHTS_SHARD);
        let mut bytes = fs::read(&shard).unwrap();
        bytes.extend_from_slice(&[0u8; 8]);
        fs::write(&shard, &bytes).unwrap();

        assert!(validate_bundle(&dir).is_err());
    }

    #[test]
    fn test_missing_shard_fails_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("m");
        export_bundle(&known_layers(), "m", &dir).unwrap();
        fs::remove_file(dir.join(WEIGHTS_SHARD)).unwrap();
        assert!(validate_bundle(&dir).is_err());
    }

    #[test]
    fn test_inconsistent_chain_is_rejected() {
        let mut layers = known_layers();
        layers[1].input_dim = 3; // no longer matches kernel or chain
        let tmp = tempfile::tempdir().unwrap();
        assert!(export_bundle(&layers, "m", &tmp.path().join("m")).is_err());
    }

    #[test]
    fn test_empty_export_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(export_bundle(&[], "m", &tmp.path().join("m")).is_err());
    }

    #[test]
    fn test_wrong_input_arity() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("m");
        export_bundle(&known_layers(), "m", &dir).unwrap();
        let model = BundleModel::load(&dir).unwrap();
        assert!(model.predict(&[1.0, 2.0, 3.0]).is_err());
    }
}
