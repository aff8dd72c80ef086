pub mod adapter {
    pub mod intensityfunction;
}

pub mod configuration;

pub mod consequence {
    pub mod expectedconsequence;
}

pub mod error;

pub mod fragility {
    pub mod fragilitycurve;
    pub mod lognormalfragility;
    pub mod tabulatedfragility;
    pub mod hazus;
    pub mod fragilitysetmanager;
}

pub mod hazard {
    pub mod hazardcurve;
    pub mod lognormalhazard;
    pub mod tabulatedhazard;
    pub mod lateralspreading;
    pub mod hazardmodel;
    pub mod hazardmodelmanager;
}

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod interpolatedcurve;
        pub mod nonparametriccurve {
            pub mod nonparametriccurve;
            pub mod piecewisepolynomial;
        }
    }
}

pub mod quadrature {
    pub mod gausslegendre;
    pub mod convergence;
    pub mod primaryevent;
    pub mod secondaryevent;
}
