use std::rc::Rc;
use std::sync::Arc;

use serde::Deserialize;

use crate::consequence::expectedconsequence::ExpectedConsequence;
use crate::fragility::fragilitycurve::FragilityCurve;
use crate::fragility::hazus::{
    HazusBridgeFragility,
    HazusLiquefactionFragility
};
use crate::fragility::lognormalfragility::{
    LognormalFragility,
    LognormalFragilityParameters
};
use crate::fragility::tabulatedfragility::TabulatedFragility;
use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;
use crate::math::curve::nonparametriccurve::piecewisepolynomial::PolynomialType;

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum FragilitySetType {
    Custom,
    HazusBridge,
    HazusLiquefaction
}


#[derive(Deserialize)]
struct FragilitySetTypedObject {
    #[serde(rename = "type")]
    set_type: FragilitySetType
}


#[derive(Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
enum FragilityCurveJsonProp {
    Lognormal(LognormalFragilityParameters),
    Tabulated {
        intensities: Vec<f64>,
        probabilities: Vec<f64>,
        #[serde(default)]
        method: PolynomialType
    }
}


fn default_scale() -> f64 {
    1.0
}


#[derive(Deserialize)]
struct CustomFragilitySetJsonProp {
    curves: Vec<FragilityCurveJsonProp>,
    consequences: Vec<f64>,
    /// multiplies every lognormal median
    #[serde(default = "default_scale")]
    scale: f64
}


#[derive(Deserialize)]
struct HazusFragilitySetJsonProp {
    replacement_cost: f64,
    #[serde(default = "default_scale")]
    scale: f64
}


fn get_fragility_curve_from_json_prop(prop: FragilityCurveJsonProp, scale: f64) -> Result<Arc<dyn FragilityCurve>, ManagerError> {
    let curve: Arc<dyn FragilityCurve> = match prop {
        FragilityCurveJsonProp::Lognormal(parameters) => {
            Arc::new(LognormalFragility::from_parameters(parameters)?.scaled(scale)?)
        },
        FragilityCurveJsonProp::Tabulated { intensities, probabilities, method } => {
            Arc::new(TabulatedFragility::new(&intensities, &probabilities, method)?)
        }
    };
    Ok(curve)
}


fn get_fragility_set_from_json(json_value: serde_json::Value) -> Result<Rc<ExpectedConsequence>, ManagerError> {
    let typed_object: FragilitySetTypedObject = ManagerError::from_json_or_json_parse_error(json_value.clone())?;
    let consequence = match typed_object.set_type {
        FragilitySetType::Custom => {
            let prop: CustomFragilitySetJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
            let curves = prop.curves
                .into_iter()
                .map(|curve| get_fragility_curve_from_json_prop(curve, prop.scale))
                .collect::<Result<Vec<_>, _>>()?;
            ExpectedConsequence::new(curves, prop.consequences)?
        },
        FragilitySetType::HazusBridge => {
            let prop: HazusFragilitySetJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
            HazusBridgeFragility::with_scale(prop.scale)?.expected_consequence(prop.replacement_cost)?
        },
        FragilitySetType::HazusLiquefaction => {
            let prop: HazusFragilitySetJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
            HazusLiquefactionFragility::new()?.expected_consequence(prop.replacement_cost)?
        }
    };
    Ok(Rc::new(consequence))
}


pub struct FragilitySetManager;


impl FragilitySetManager {
    pub fn new() -> Manager<Rc<ExpectedConsequence>> {
        Manager::new(get_fragility_set_from_json)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use serde_json::json;

    use super::*;
    use crate::adapter::intensityfunction::IntensityFunction;
    use crate::error::RiskError;
    use crate::manager::manager::IManager;

    #[test]
    fn custom_set_mixes_curve_types() {
        let manager = FragilitySetManager::new();
        manager
            .insert_obj_from_json(json!({
                "name": "culvert",
                "type": "custom",
                "curves": [
                    {"type": "lognormal", "median": 0.5, "dispersion": 0.4},
                    {"type": "tabulated", "intensities": [0.0, 1.0, 2.0], "probabilities": [0.0, 0.2, 1.0]}
                ],
                "consequences": [10.0, 100.0]
            }))
            .unwrap();
        let consequence = manager.get("culvert").unwrap();
        assert_eq!(consequence.n_damage_states(), 2);
        // P(DS1 ≥) = 0.5, P(DS2 ≥) = 0.1 at the lognormal median
        assert_relative_eq!(consequence.evaluate(0.5), 0.4 * 10.0 + 0.1 * 100.0, epsilon = 1e-12);
    }

    #[test]
    fn scale_moves_lognormal_medians() {
        let manager = FragilitySetManager::new();
        manager
            .insert_obj_from_json(json!({
                "name": "aged",
                "type": "custom",
                "curves": [{"type": "lognormal", "median": 0.5, "dispersion": 0.4}],
                "consequences": [1.0],
                "scale": 0.8
            }))
            .unwrap();
        assert_relative_eq!(manager.get("aged").unwrap().evaluate(0.4), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn hazus_sets_scale_damage_ratios() {
        let manager = FragilitySetManager::new();
        manager
            .insert_obj_from_json_vec(&[
                json!({"name": "bridge", "type": "hazus_bridge", "replacement_cost": 1000.0}),
                json!({"name": "spreading", "type": "hazus_liquefaction", "replacement_cost": 1000.0}),
            ])
            .unwrap();
        assert_relative_eq!(manager.get("bridge").unwrap().evaluate(50.0), 1000.0, max_relative = 1e-9);
        assert_relative_eq!(manager.get("spreading").unwrap().evaluate(1000.0), 1000.0, max_relative = 1e-9);
    }

    #[test]
    fn unequal_lengths_are_model_errors() {
        let manager = FragilitySetManager::new();
        let result = manager.insert_obj_from_json(json!({
            "name": "broken",
            "type": "custom",
            "curves": [{"type": "lognormal", "median": 0.5, "dispersion": 0.4}],
            "consequences": [1.0, 2.0]
        }));
        assert!(matches!(
            result,
            Err(ManagerError::ModelError(RiskError::LengthMismatch { fragility_curves: 1, consequences: 2 }))
        ));
    }
}
