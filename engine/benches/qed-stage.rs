use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use ndarray::{Array1, Array2};

use config::{RadiationKind, SpeciesQedConfig};
use engine::{ParticleBlock, QedStage};
use tables::{RadiationTableParams, RadiationTables};

const BEAM_SIZE: usize = 50_000;

fn setup() -> (QedStage, ParticleBlock, Vec<f64>, Vec<f64>) {
    let config = SpeciesQedConfig {
        radiation_model: RadiationKind::MonteCarlo,
        norm_schwinger_field: 1.0,
        dt: 1.0,
        ..Default::default()
    };
    let params = RadiationTableParams {
        minimum_chi_continuous: config.chi_threshold_continuous,
        minimum_chi_discontinuous: config.chi_threshold_discontinuous,
        normalized_compton_wavelength: config.normalized_compton_wavelength,
    };
    let n = 128;
    let yield_table = Array1::from_elem(n, 1.0);
    let cdf = Array2::from_shape_fn((n, 64), |(_, j)| (j as f64 / 63.0).max(1e-6));
    let tables =
        Arc::new(RadiationTables::from_arrays(params, 1e-4, 1e3, yield_table, cdf).unwrap());

    let stage = QedStage::new(&config, Some(tables), None, 1, 0xBEAC).unwrap();

    let mut electrons = ParticleBlock::new(1).unwrap();
    for i in 0..BEAM_SIZE {
        let gamma = 500.0 + 500.0 * (i as f64 / (BEAM_SIZE - 1) as f64);
        let p = (gamma * gamma - 1.0).sqrt();
        electrons.push(&[i as f64], [p, 0.0, 0.0], 1.0, -1).unwrap();
    }

    // χ ≈ 0.3 at the beam center, well inside the Monte-Carlo regime.
    let b = 0.3 / 750.0;
    let epart = vec![0.0; 3 * BEAM_SIZE];
    let mut bpart = vec![0.0; 3 * BEAM_SIZE];
    bpart[2 * BEAM_SIZE..].fill(b);

    (stage, electrons, epart, bpart)
}

fn monte_carlo_radiation(c: &mut Criterion) {
    let (mut stage, electrons, epart, bpart) = setup();

    let mut group = c.benchmark_group("QED stage");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("monte-carlo radiation, 50k leptons", |b| {
        b.iter(|| {
            let mut block = electrons.clone();
            stage
                .run_radiation(&mut block, &epart, &bpart, 0, None)
                .unwrap()
        })
    });
}

criterion_group!(benches, monte_carlo_radiation);
criterion_main!(benches);
