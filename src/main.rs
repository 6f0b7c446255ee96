use std::env;
use std::error::Error;

use gkquad::configuration::Configuration;
use gkquad::manager::manager::IManager;
use gkquad::quadrature::integrationresult::IntegrationResult;
use gkquad::workspace::workspacepool::SingleThreadedWorkspacePool;

fn print_result(label: &str, result: &IntegrationResult) -> Result<(), Box<dyn Error>> {
    let line = serde_json::json!({"integrand": label, "result": result});
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Configuration::new();
    if let Some(config_path) = env::args().nth(1) {
        config.from_reader(&config_path)?;
    }
    let pool = SingleThreadedWorkspacePool::from_configuration(&config.limits())?;
    let tolerance = config.tolerance();

    print_result("x^2 on [0, 1]", &pool.integrate_with(|x| x * x, 0.0, 1.0, &tolerance))?;
    print_result("sin(x) on [0, pi]", &pool.integrate_with(f64::sin, 0.0, std::f64::consts::PI, &tolerance))?;
    print_result("1/sqrt(x) on [0, 1]", &pool.integrate_with(|x| 1.0 / x.sqrt(), 0.0, 1.0, &tolerance))?;
    print_result("1/x on [0, 1]", &pool.integrate_with(|x| 1.0 / x, 0.0, 1.0, &tolerance))?;

    let manager = config.substitution_manager();
    for name in manager.names() {
        let substitution = manager.get(&name)?;
        let result = pool.integrate_substituted(
            |x: f64| (-x).exp(),
            0.0,
            f64::INFINITY,
            tolerance.epsabs(),
            tolerance.epsrel(),
            substitution.as_ref(),
        );
        print_result(&format!("exp(-x) on [0, inf) via '{}'", name), &result)?;
    }
    Ok(())
}
