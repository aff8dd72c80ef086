use std::rc::Rc;

use serde::Deserialize;

use crate::hazard::hazardmodel::HazardModel;
use crate::hazard::lognormalhazard::{
    LognormalHazard,
    LognormalHazardParameters
};
use crate::hazard::tabulatedhazard::{
    HazardTableKind,
    TabulatedHazardCurve,
    TabulatedLikelihood
};
use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;
use crate::math::curve::interpolatedcurve::InterpolationSpace;
use crate::math::curve::nonparametriccurve::piecewisepolynomial::PolynomialType;

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum HazardType {
    Lognormal,
    Tabulated
}


#[derive(Deserialize)]
struct HazardTypedObject {
    #[serde(rename = "type")]
    hazard_type: HazardType
}


#[derive(Deserialize)]
struct TabulatedHazardJsonProp {
    kind: HazardTableKind,
    intensities: Vec<f64>,
    values: Vec<f64>,
    #[serde(default)]
    method: PolynomialType,
    #[serde(default)]
    space: InterpolationSpace
}


fn get_hazard_model_from_json(json_value: serde_json::Value) -> Result<Rc<HazardModel>, ManagerError> {
    let typed_object: HazardTypedObject = ManagerError::from_json_or_json_parse_error(json_value.clone())?;
    let model = match typed_object.hazard_type {
        HazardType::Lognormal => {
            let parameters: LognormalHazardParameters = ManagerError::from_json_or_json_parse_error(json_value)?;
            HazardModel::Lognormal(LognormalHazard::new(parameters)?)
        },
        HazardType::Tabulated => {
            let prop: TabulatedHazardJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
            match prop.kind {
                HazardTableKind::Exceedance => HazardModel::Exceedance(
                    TabulatedHazardCurve::new(&prop.intensities, &prop.values, prop.method, prop.space)?
                ),
                HazardTableKind::Likelihood => HazardModel::Likelihood(
                    TabulatedLikelihood::new(&prop.intensities, &prop.values, prop.method, prop.space)?
                )
            }
        }
    };
    Ok(Rc::new(model))
}


pub struct HazardModelManager;


impl HazardModelManager {
    pub fn new() -> Manager<Rc<HazardModel>> {
        Manager::new(get_hazard_model_from_json)
    }
}
