use std::error::Error;

use tracing_subscriber::{
    fmt,
    prelude::*,
    EnvFilter
};

use riskquad::configuration::Configuration;
use riskquad::fragility::hazus::{
    HazusBridgeFragility,
    HazusLiquefactionFragility
};
use riskquad::hazard::lateralspreading::{
    LateralSpreadingHazard,
    LateralSpreadingParameters
};
use riskquad::hazard::lognormalhazard::{
    LognormalHazard,
    LognormalHazardParameters
};
use riskquad::manager::manager::IManager;
use riskquad::quadrature::convergence::QuadratureSettings;
use riskquad::quadrature::primaryevent::generate_primary_event;
use riskquad::quadrature::secondaryevent::generate_secondary_event;

// deck area of the example bridge, m²
const DECK_AREA: f64 = 1000.0;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => run_bridge_example(),
        [config_path, lower, upper] => run_configuration(config_path, lower.parse()?, upper.parse()?),
        _ => Err("usage: riskquad [CONFIG_JSON LOWER_IM UPPER_IM]".into())
    }
}

fn run_bridge_example() -> Result<(), Box<dyn Error>> {
    let hazard = LognormalHazard::new(LognormalHazardParameters::default())?;
    let settings = QuadratureSettings::default();

    for scale in [1.0, 0.8] {
        let consequence = HazusBridgeFragility::with_scale(scale)?.expected_consequence(DECK_AREA)?;
        let event = generate_primary_event(0.05, 3.0, &hazard, &consequence, settings)?;
        println!(
            "ground shaking, median scale {:.1}: annual loss {:.6} m² (order {}, error {:e})",
            scale,
            event.value(),
            event.outcome().order(),
            event.error()
        );
    }

    let spreading = LateralSpreadingHazard::new(hazard, LateralSpreadingParameters::default())?;
    let consequence = HazusLiquefactionFragility::new()?.expected_consequence(DECK_AREA)?;
    let event = generate_secondary_event(
        0.09,
        3.0,
        0.1,
        200.0,
        &spreading,
        &consequence,
        settings.with_orders(1, 40)
    )?;
    println!(
        "lateral spreading: annual loss {:.6} m² (order {}, error {:e})",
        event.value(),
        event.outcome().order(),
        event.error()
    );
    Ok(())
}

fn run_configuration(config_path: &str, lower: f64, upper: f64) -> Result<(), Box<dyn Error>> {
    let config = Configuration::new();
    config.from_reader(config_path)?;
    let settings = config.primary_quadrature();
    let hazard_names = config.hazard_model_manager().names();
    let fragility_names = config.fragility_set_manager().names();
    for hazard_name in &hazard_names {
        let hazard = config.hazard_model_manager().get(hazard_name)?;
        for fragility_name in &fragility_names {
            let consequence = config.fragility_set_manager().get(fragility_name)?;
            let event = generate_primary_event(lower, upper, hazard.as_ref(), consequence.as_ref(), settings)?;
            println!(
                "{} x {}: {:.6} ({})",
                hazard_name,
                fragility_name,
                event.value(),
                if event.outcome().is_converged() { "converged" } else { "max order reached" }
            );
        }
    }
    Ok(())
}
