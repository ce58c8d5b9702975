use diffevo_de::{DEConfigBuilder, Updating, differential_evolution};
use diffevo_testfunctions::{get_function_bounds_vec, rosenbrock};

#[test]
fn test_de_rosenbrock_2d() {
    let b2 = get_function_bounds_vec("rosenbrock", 2);
    let c2 = DEConfigBuilder::new().seed(11).maxiter(300).popsize(40).build().unwrap();
    let report = differential_evolution(&rosenbrock, &b2, c2).unwrap();
    assert!(report.fun < 1e-2, "f={}", report.fun);
    assert!((report.x[0] - 1.0).abs() < 0.2 && (report.x[1] - 1.0).abs() < 0.4);
}

#[test]
fn test_de_rosenbrock_5d() {
    // NP=75, 300 generations on [-5, 10]^5
    let b5 = get_function_bounds_vec("rosenbrock", 5);
    for updating in [Updating::Deferred, Updating::Immediate] {
        let c5 = DEConfigBuilder::new()
            .seed(1)
            .maxiter(300)
            .popsize(75)
            .updating(updating)
            .build()
            .unwrap();
        let report = differential_evolution(&rosenbrock, &b5, c5).unwrap();
        assert!(report.fun < 10.0, "{}: f={}", updating, report.fun);
        assert!(report.history.get(0).unwrap() > report.fun);
    }
}
