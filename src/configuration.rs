use std::cell::{
    RefCell,
    RefMut
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::consequence::expectedconsequence::ExpectedConsequence;
use crate::fragility::fragilitysetmanager::FragilitySetManager;
use crate::hazard::hazardmodel::HazardModel;
use crate::hazard::hazardmodelmanager::HazardModelManager;
use crate::manager::managererror::ManagerError;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::quadrature::convergence::QuadratureSettings;


#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    primary_quadrature: QuadratureSettings,
    #[serde(default)]
    secondary_quadrature: QuadratureSettings,
    #[serde(default)]
    hazard: Vec<serde_json::Value>,
    #[serde(default)]
    fragility: Vec<serde_json::Value>
}

/// Quadrature settings for both engines plus the named hazard models and
/// fragility sets of one run.
pub struct Configuration {
    primary_quadrature: RefCell<QuadratureSettings>,
    secondary_quadrature: RefCell<QuadratureSettings>,
    hazard_model_manager_cell: RefCell<Manager<Rc<HazardModel>>>,
    fragility_set_manager_cell: RefCell<Manager<Rc<ExpectedConsequence>>>
}


impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            primary_quadrature: RefCell::new(QuadratureSettings::default()),
            secondary_quadrature: RefCell::new(QuadratureSettings::default()),
            hazard_model_manager_cell: RefCell::new(HazardModelManager::new()),
            fragility_set_manager_cell: RefCell::new(FragilitySetManager::new())
        }
    }

    pub fn primary_quadrature(&self) -> QuadratureSettings {
        *self.primary_quadrature.borrow()
    }

    pub fn secondary_quadrature(&self) -> QuadratureSettings {
        *self.secondary_quadrature.borrow()
    }

    pub fn hazard_model_manager(&self) -> RefMut<'_, Manager<Rc<HazardModel>>> {
        self.hazard_model_manager_cell.borrow_mut()
    }

    pub fn fragility_set_manager(&self) -> RefMut<'_, Manager<Rc<ExpectedConsequence>>> {
        self.fragility_set_manager_cell.borrow_mut()
    }

    /// Loads one JSON file; sections that are absent keep their current
    /// contents. Both quadrature sections are validated before anything is
    /// stored.
    pub fn from_reader<P: AsRef<Path>>(&self, file_path: P) -> Result<(), ManagerError> {
        let file = File::open(file_path).map_err(ManagerError::IOError)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader).map_err(ManagerError::JsonParseError)?;
        json_prop.primary_quadrature.validate()?;
        json_prop.secondary_quadrature.validate()?;
        *self.primary_quadrature.borrow_mut() = json_prop.primary_quadrature;
        *self.secondary_quadrature.borrow_mut() = json_prop.secondary_quadrature;
        self.hazard_model_manager().insert_obj_from_json_vec(&json_prop.hazard)?;
        self.fragility_set_manager().insert_obj_from_json_vec(&json_prop.fragility)?;
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
