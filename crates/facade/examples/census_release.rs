use census_dp::{
    census_table, synthetic_census, MechanismKind, ReleaseConfig, RngSampler, TableRelease,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() {
    env_logger::init();

    let mut rng = ChaCha8Rng::seed_from_u64(2020);
    let people = synthetic_census(100, &mut rng).expect("population");
    let truth = census_table(&people).expect("crosstab");

    for kind in [MechanismKind::Laplace, MechanismKind::Geometric] {
        let config = ReleaseConfig::default().with_epsilon(1.0).with_kind(kind);
        let mut sampler = RngSampler::seeded(7);
        let release = TableRelease::run(truth.clone(), &config, &mut sampler).expect("release");

        println!("== {kind} (epsilon={}) ==", config.epsilon);
        let labels = &truth.labels()[0].categories;
        for (i, name) in labels.iter().enumerate() {
            let t = truth.counts();
            let p = release.published().values();
            println!(
                "{name:>14}: true [{:>3}, {:>3}]  published [{:>4}, {:>4}]",
                t[[i, 0]],
                t[[i, 1]],
                p[[i, 0]],
                p[[i, 1]]
            );
        }
        let report = release.report();
        println!(
            "total L1 {:.0}, relative L1 {:.2}%, max cell error {:.0}",
            report.total_l1(),
            report.relative_l1(),
            report.max_absolute()
        );
    }
}
