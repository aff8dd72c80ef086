//! A JSON configuration drives both engines end to end.

use std::io::Write;

use approx::assert_relative_eq;
use serde_json::json;
use tempfile::NamedTempFile;

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
use riskquad::quadrature::primaryevent::generate_primary_event;
use riskquad::quadrature::secondaryevent::generate_secondary_event;

fn config_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let config = json!({
        "primary_quadrature": {"max_order": 60},
        "secondary_quadrature": {"max_order": 30},
        "hazard": [
            {"name": "baker", "type": "lognormal"}
        ],
        "fragility": [
            {"name": "bridge", "type": "hazus_bridge", "replacement_cost": 1000.0},
            {"name": "aged_bridge", "type": "hazus_bridge", "replacement_cost": 1000.0, "scale": 0.8},
            {"name": "spreading", "type": "hazus_liquefaction", "replacement_cost": 1000.0}
        ]
    });
    write!(file, "{}", config).unwrap();
    file
}

#[test]
fn configured_models_match_direct_construction() {
    let file = config_file();
    let config = Configuration::new();
    config.from_reader(file.path()).unwrap();

    let hazard = config.hazard_model_manager().get("baker").unwrap();
    let bridge = config.fragility_set_manager().get("bridge").unwrap();
    let settings = config.primary_quadrature();
    let configured = generate_primary_event(0.05, 3.0, hazard.as_ref(), bridge.as_ref(), settings).unwrap();

    let direct_hazard = LognormalHazard::new(LognormalHazardParameters::default()).unwrap();
    let direct_bridge = HazusBridgeFragility::new().unwrap().expected_consequence(1000.0).unwrap();
    let direct = generate_primary_event(0.05, 3.0, &direct_hazard, &direct_bridge, settings).unwrap();

    assert_eq!(configured.value(), direct.value());
    // loss is bounded by the deck area times the annual rate of any shaking
    assert!(configured.value() > 0.0 && configured.value() < 1000.0 * 0.01);
}

#[test]
fn deteriorated_bridge_carries_more_risk() {
    let file = config_file();
    let config = Configuration::new();
    config.from_reader(file.path()).unwrap();

    let hazard = config.hazard_model_manager().get("baker").unwrap();
    let settings = config.primary_quadrature();
    let pristine = config.fragility_set_manager().get("bridge").unwrap();
    let aged = config.fragility_set_manager().get("aged_bridge").unwrap();
    let pristine = generate_primary_event(0.05, 3.0, hazard.as_ref(), pristine.as_ref(), settings).unwrap();
    let aged = generate_primary_event(0.05, 3.0, hazard.as_ref(), aged.as_ref(), settings).unwrap();
    assert!(aged.value() > pristine.value());
}

#[test]
fn lateral_spreading_risk_is_a_fraction_of_the_primary_rate() {
    let file = config_file();
    let config = Configuration::new();
    config.from_reader(file.path()).unwrap();

    let primary = LognormalHazard::new(LognormalHazardParameters::default()).unwrap();
    let spreading = LateralSpreadingHazard::new(primary, LateralSpreadingParameters::default()).unwrap();
    let consequence = config.fragility_set_manager().get("spreading").unwrap();
    let event = generate_secondary_event(
        0.09,
        3.0,
        0.1,
        200.0,
        &spreading,
        consequence.as_ref(),
        config.secondary_quadrature(),
    )
    .unwrap();

    assert!(event.value().is_finite());
    assert!(event.value() >= 0.0);
    assert!(event.value() < 1000.0 * 0.01);
    assert_eq!(event.scenario().len(), event.outcome().order().pow(2));

    let direct = HazusLiquefactionFragility::new().unwrap().expected_consequence(1000.0).unwrap();
    let direct_event = generate_secondary_event(
        0.09,
        3.0,
        0.1,
        200.0,
        &spreading,
        &direct,
        config.secondary_quadrature(),
    )
    .unwrap();
    assert_relative_eq!(event.value(), direct_event.value(), max_relative = 1e-15);
}
