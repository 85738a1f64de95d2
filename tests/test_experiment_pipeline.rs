/// End-to-end experiment pipeline tests
///
/// Load parameters, evaluate a population in parallel, write fitness back and
/// draw the best network, all through the umbrella crate.
use image::RgbImage;
use neatkit::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[derive(Debug, Clone)]
struct Genome {
    network: NetworkView,
    fitness: f64,
}

impl FitnessTarget for Genome {
    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

#[derive(Debug, thiserror::Error)]
#[error("network has no connections")]
struct EmptyNetwork;

/// Genome with `hidden` hidden neurons, each wired input -> hidden -> output
fn genome(hidden: usize) -> Genome {
    let mut net = NetworkView::new();
    let input = net.add_neuron(NeuronView::new(0, 0.0));
    let output = net.add_neuron(NeuronView::new(1, 1.0));
    for h in 0..hidden {
        let idx = net.add_neuron(NeuronView::new(2 + h, 0.5));
        net.add_connection(ConnectionView::new(input, idx, 1.0 + h as f64, false));
        net.add_connection(ConnectionView::new(idx, output, -0.5, false));
    }
    Genome {
        network: net,
        fitness: 0.0,
    }
}

fn connection_count_fitness(g: &Genome) -> Result<f64, EmptyNetwork> {
    if g.network.connections.is_empty() {
        return Err(EmptyNetwork);
    }
    Ok(g.network.connections.len() as f64)
}

#[test]
fn test_load_fixture_parameters() {
    let params = load_config(Some(fixture("xor_params.txt").as_path()), None)
        .expect("Failed to load fixture parameters");

    assert!(params.is_validated());
    assert_eq!(params.len(), REQUIRED_PARAMETERS.len());
    assert_eq!(params.get("PopulationSize"), Some(ParameterValue::Int(150)));
    assert_eq!(params.get("DynamicCompatibility"), Some(ParameterValue::Bool(true)));
    assert_eq!(params.get_float("MaxWeight"), Some(8.0));
    // Integers widen when read as floats
    assert_eq!(params.get_float("MinSpecies"), Some(5.0));

    validate_parameters(&params).expect("Fixture parameters out of range");
}

#[test]
fn test_cli_override_applied_last() {
    let mut cli = HashMap::new();
    cli.insert("PopulationSize".to_string(), "300".to_string());

    let params = load_config(Some(fixture("xor_params.txt").as_path()), Some(&cli)).unwrap();
    assert_eq!(params.get_int("PopulationSize"), Some(300));
}

#[test]
fn test_incomplete_file_names_missing_parameter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.txt");
    let full = std::fs::read_to_string(fixture("xor_params.txt")).unwrap();
    let without: String = full
        .lines()
        .filter(|l| !l.starts_with("OldAgePenalty"))
        .map(|l| format!("{}\n", l))
        .collect();
    std::fs::write(&path, without).unwrap();

    match load_config(Some(path.as_path()), None) {
        Err(ConfigError::IncompleteConfiguration { missing }) => {
            assert_eq!(missing, vec!["OldAgePenalty".to_string()]);
        }
        other => panic!("Expected IncompleteConfiguration, got {:?}", other),
    }
}

#[test]
fn test_evaluate_population_and_draw_best() {
    let mut species = vec![
        vec![genome(1), genome(3)],
        vec![genome(2)],
        vec![genome(4), genome(2), genome(1)],
    ];

    let fitness = evaluate_population(
        &mut species,
        connection_count_fitness,
        &EvaluationConfig::parallel(3),
        &NoProgress,
    )
    .expect("Population evaluation failed");

    assert_eq!(fitness, vec![2.0, 6.0, 4.0, 8.0, 4.0, 2.0]);
    assert_eq!(species[2][0].fitness, 8.0);

    let mut best = species
        .iter()
        .flatten()
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .cloned()
        .expect("population is empty");

    let mut image = RgbImage::new(200, 200);
    let report = draw_phenotype(
        &mut image,
        Rect::from_size(200, 200),
        &mut best.network,
        &DrawOptions::default(),
    )
    .expect("Failed to draw best network");

    assert_eq!(report.connections_drawn, 8);
    assert!(image.pixels().any(|p| p.0 != [0, 0, 0]));
}

#[test]
fn test_failed_candidate_aborts_population() {
    let empty = Genome {
        network: NetworkView::new(),
        fitness: -1.0,
    };
    let mut species = vec![vec![genome(1), genome(2), empty, genome(3), genome(1)]];

    let err = evaluate_population(
        &mut species,
        connection_count_fitness,
        &EvaluationConfig::parallel(2),
        &NoProgress,
    )
    .unwrap_err();

    assert_eq!(err.candidate_index(), Some(2));
    assert_eq!(species[0][0].fitness, 0.0);
    assert_eq!(species[0][2].fitness, -1.0);
}

#[test]
fn test_evaluation_mode_from_json() {
    let config: EvaluationConfig =
        serde_json::from_str(r#"{"mode": {"parallel": {"workers": 2}}}"#).unwrap();
    assert_eq!(config.mode, EvaluationMode::Parallel { workers: 2 });
}
