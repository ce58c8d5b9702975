use diffevo_de::{
    Bounds, DEConfigBuilder, DifferentialEvolution, SeedStatistics, differential_evolution,
    run_recorded_differential_evolution, run_seeds,
};
use diffevo_testfunctions::{create_bounds, sphere};

#[test]
fn test_de_sphere_2d_over_seeds() {
    // 2D sphere, NP=20, F=0.8, CR=0.7, 50 generations
    let bounds = Bounds::new(&create_bounds(2, -10.0, 10.0)).unwrap();
    let config = DEConfigBuilder::new()
        .popsize(20)
        .mutation(0.8)
        .recombination(0.7)
        .maxiter(50)
        .build()
        .unwrap();
    let seeds: Vec<u64> = (0..12).collect();
    let reports = run_seeds(&sphere, &bounds, &config, &seeds).unwrap();

    let close = reports
        .iter()
        .filter(|r| r.x.iter().all(|xi| xi.abs() < 0.2))
        .count();
    let stats = SeedStatistics::from_reports(&reports, 1e-2);
    assert!(stats.success_rate() >= 0.9, "{:?}", stats);
    assert!(close as f64 / reports.len() as f64 >= 0.9, "{} of {} near origin", close, reports.len());
    for report in &reports {
        assert_eq!(report.history.len(), 50);
    }
}

#[test]
fn test_de_sphere_5d() {
    let b5 = create_bounds(5, -10.0, 10.0);
    let c5 = DEConfigBuilder::new().seed(31).maxiter(100).popsize(50).build().unwrap();
    let report = differential_evolution(&sphere, &b5, c5).unwrap();
    assert!(report.fun < 1e-2, "f={}", report.fun);
    assert_eq!(report.nfev, 50 + 50 * 100);
}

#[test]
fn test_de_sphere_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let b2 = create_bounds(2, -5.0, 5.0);
    let c2 = DEConfigBuilder::new()
        .seed(30)
        .maxiter(60)
        .popsize(20)
        .recombination(0.8)
        .build()
        .unwrap();
    let (report, csv_path) =
        run_recorded_differential_evolution("sphere_2d", &sphere, &b2, c2, dir.path()).unwrap();
    assert!(report.fun < 1e-3);
    assert!(csv_path.exists());
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("generation,x0,x1,best_result,mean,std,accepted,is_improvement"));
    assert_eq!(text.lines().count(), 61);
}

#[test]
fn test_de_sphere_step_by_step_matches_optimize() {
    let bounds = Bounds::new(&create_bounds(3, -5.0, 5.0)).unwrap();
    let config = DEConfigBuilder::new().seed(5).maxiter(20).popsize(10).build().unwrap();

    let mut stepped = DifferentialEvolution::new(&sphere, bounds.clone(), config.clone()).unwrap();
    let mut last = None;
    for _ in 0..20 {
        last = Some(stepped.step().unwrap());
    }
    let report = DifferentialEvolution::new(&sphere, bounds, config).unwrap().optimize().unwrap();
    assert_eq!(stepped.history(), &report.history);
    assert_eq!(last.unwrap().best_fitness, report.fun);
    assert_eq!(stepped.population(), &report.population);
}
