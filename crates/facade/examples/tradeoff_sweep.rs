use census_dp::{simulate_tradeoff_seeded, MechanismKind, SweepConfig};

fn main() {
    env_logger::init();

    for kind in [MechanismKind::Laplace, MechanismKind::Geometric] {
        let config = SweepConfig::default().with_kind(kind);
        let result = simulate_tradeoff_seeded(&config, 0).expect("sweep");

        println!("== {kind} ==");
        println!("{:>9} {:>10} {:>10} {:>10}", "epsilon", "mean L1", "std L1", "expected");
        for p in &result {
            println!(
                "{:>9.4} {:>10.4} {:>10.4} {:>10.4}",
                p.epsilon, p.mean_l1, p.std_l1, p.expected_l1
            );
        }
        match result.spearman_correlation() {
            Some(rho) => println!("spearman(epsilon, mean L1) = {rho:.3}"),
            None => println!("spearman(epsilon, mean L1) undefined"),
        }
    }
}
