use anyhow::{Context, Result};
use bincode::config;
use clap::Parser;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read as _;
use std::path::PathBuf;

use yao_gc::circuit::WireId;
use yao_gc::counter::count_gate_types;
use yao_gc::evaluator::evaluate;
use yao_gc::exchange::{merge_party_assignments, LabelAssignment};
use yao_gc::garbler::{garble, EvaluatorSetup, GarblerSecrets};
use yao_gc::label::Label;
use yao_gc::netlist::{self, NetlistDocument};

/// The input/output port↔bit-wire maps an importer produced, persisted alongside a
/// `garble` run's setup so `eval` can translate raw wire results back to port names.
#[derive(serde::Serialize, serde::Deserialize)]
struct PortMap {
    inputs: HashMap<String, Vec<WireId>>,
    outputs: HashMap<String, Vec<WireId>>,
}

/// Two-party Yao garbled circuit construction and evaluation
#[derive(Parser, Debug)]
#[command(name = "yao-gc")]
#[command(about = "Garble and evaluate Boolean circuits using Yao's protocol with free XOR")]
#[command(version)]
#[command(subcommand_required = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Report gate-type counts for a synthesized netlist
    Stats {
        /// Path to a Yosys-style JSON netlist
        netlist: PathBuf,
    },
    /// Garble a netlist, producing an evaluator setup and the garbler's private secrets
    Garble {
        /// Path to a Yosys-style JSON netlist
        netlist: PathBuf,
        /// File containing a 32-byte seed for the garbling CSPRNG (random if omitted)
        #[arg(short = 's', long = "seed-file")]
        seed_file: Option<PathBuf>,
        /// Output file for the evaluator setup (default: <netlist>.setup)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        /// Output file for the garbler's private secrets (default: <netlist>.secrets)
        #[arg(long = "secrets-output")]
        secrets_output: Option<PathBuf>,
    },
    /// Simulate a label exchange for one party, selecting labels for a bit assignment
    Exchange {
        /// Garbler secrets produced by `garble`
        secrets: PathBuf,
        /// JSON object mapping wire id (as a string) to the bit that wire carries
        bits: PathBuf,
        /// Output file for this party's label assignment (default: <bits>.labels)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Evaluate a garbled circuit against one or more parties' label assignments
    Eval {
        /// Evaluator setup produced by `garble`
        setup: PathBuf,
        /// Label assignment files produced by `exchange`, one per party
        labels: Vec<PathBuf>,
        /// Port map produced by `garble` (default: <setup with .ports extension>); when
        /// present, output is reported per port name/value instead of raw wire ids
        #[arg(long = "ports")]
        ports: Option<PathBuf>,
    },
}

fn read_netlist(path: &PathBuf) -> Result<NetlistDocument> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading netlist file {}", path.display()))?;
    let doc: NetlistDocument = serde_json::from_str(&data)
        .with_context(|| format!("parsing netlist file {}", path.display()))?;
    Ok(doc)
}

fn read_seed(seed_file: &Option<PathBuf>) -> Result<[u8; 32]> {
    match seed_file {
        Some(path) => {
            let mut file = File::open(path)
                .with_context(|| format!("opening seed file {}", path.display()))?;
            let mut seed = [0u8; 32];
            file.read_exact(&mut seed)
                .with_context(|| format!("seed file {} must contain at least 32 bytes", path.display()))?;
            Ok(seed)
        }
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            Ok(seed)
        }
    }
}

fn save_bincode<T: serde::Serialize>(value: &T, path: &PathBuf) -> Result<()> {
    let encoded = bincode::serde::encode_to_vec(value, config::standard())
        .context("encoding bincode artifact")?;
    std::fs::write(path, encoded).with_context(|| format!("writing {}", path.display()))
}

fn load_bincode<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let (value, _) = bincode::serde::decode_from_slice(&data, config::standard())
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(value)
}

fn with_extension(path: &PathBuf, ext: &str) -> PathBuf {
    let mut p = path.clone();
    p.set_extension(ext);
    p
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Stats { netlist } => {
            let doc = read_netlist(&netlist)?;
            let imported = netlist::import(&doc)?;
            let counts = count_gate_types(&imported.circuit);
            println!("{}", serde_json::to_string_pretty(&counts)?);
            println!("Primary inputs: {}", imported.circuit.primary_inputs().len());
            println!("Primary outputs: {}", imported.circuit.primary_outputs().len());
        }
        Commands::Garble {
            netlist,
            seed_file,
            output,
            secrets_output,
        } => {
            let doc = read_netlist(&netlist)?;
            let imported = netlist::import(&doc)?;

            let seed = read_seed(&seed_file)?;
            let mut rng = ChaCha12Rng::from_seed(seed);
            let (secrets, setup) = garble(&imported.circuit, &mut rng)?;

            let setup_path = output.unwrap_or_else(|| with_extension(&netlist, "setup"));
            let secrets_path = secrets_output.unwrap_or_else(|| with_extension(&netlist, "secrets"));
            let ports_path = with_extension(&setup_path, "ports");
            save_bincode(&setup, &setup_path)?;
            save_bincode(&secrets, &secrets_path)?;
            let port_map = PortMap {
                inputs: imported.input_bits,
                outputs: imported.output_bits,
            };
            std::fs::write(&ports_path, serde_json::to_string_pretty(&port_map)?)
                .with_context(|| format!("writing {}", ports_path.display()))?;

            println!("Evaluator setup written to: {}", setup_path.display());
            println!("Garbler secrets written to: {}", secrets_path.display());
            println!("Port map written to: {}", ports_path.display());
            println!("Gates garbled: {}", setup.gates.len());
        }
        Commands::Exchange {
            secrets,
            bits,
            output,
        } => {
            let secrets: GarblerSecrets = load_bincode(&secrets)?;
            let bits_data = std::fs::read_to_string(&bits)
                .with_context(|| format!("reading bit assignment file {}", bits.display()))?;
            let raw_bits: HashMap<String, bool> = serde_json::from_str(&bits_data)
                .with_context(|| format!("parsing bit assignment file {}", bits.display()))?;
            let bits_map: HashMap<WireId, bool> = raw_bits
                .into_iter()
                .map(|(k, v)| -> Result<(WireId, bool)> {
                    Ok((k.parse().with_context(|| format!("wire id {k} is not a valid integer"))?, v))
                })
                .collect::<Result<_>>()?;

            let assignment = yao_gc::exchange::simulate_label_exchange(&secrets.wire_to_keys, &bits_map)?;
            let output_path = output.unwrap_or_else(|| with_extension(&bits, "labels"));
            let json = serde_json::to_string_pretty(&assignment)?;
            std::fs::write(&output_path, json)
                .with_context(|| format!("writing {}", output_path.display()))?;
            println!("Label assignment written to: {}", output_path.display());
        }
        Commands::Eval {
            setup,
            labels,
            ports,
        } => {
            let ports_path = ports.unwrap_or_else(|| with_extension(&setup, "ports"));
            let setup: EvaluatorSetup = load_bincode(&setup)?;

            let mut parties = Vec::with_capacity(labels.len());
            for path in &labels {
                let data = std::fs::read_to_string(path)
                    .with_context(|| format!("reading label assignment {}", path.display()))?;
                let assignment: LabelAssignment = serde_json::from_str(&data)
                    .with_context(|| format!("parsing label assignment {}", path.display()))?;
                parties.push(assignment);
            }
            let inputs: HashMap<WireId, Label> = merge_party_assignments(&parties)?;

            let outputs = evaluate(&setup, &inputs)?;

            if let Ok(data) = std::fs::read_to_string(&ports_path) {
                let port_map: PortMap = serde_json::from_str(&data)
                    .with_context(|| format!("parsing port map {}", ports_path.display()))?;
                let mut names: Vec<_> = port_map.outputs.keys().cloned().collect();
                names.sort();
                for name in names {
                    let bits = &port_map.outputs[&name];
                    let mut value: u64 = 0;
                    for (i, wire) in bits.iter().enumerate() {
                        if outputs[wire] {
                            value |= 1u64 << i;
                        }
                    }
                    println!("{name} = {value} ({} bits)", bits.len());
                }
            } else {
                let mut sorted: Vec<_> = outputs.into_iter().collect();
                sorted.sort_by_key(|&(w, _)| w);
                for (wire, bit) in sorted {
                    println!("wire {wire}: {}", bit as u8);
                }
            }
        }
    }

    Ok(())
}
