//! The per-state probabilities built from nested fragility curves partition
//! the "some damage" probability, and the aggregate consequence stays within
//! the consequence bounds.

use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::DVector;
use proptest::prelude::*;

use riskquad::adapter::intensityfunction::IntensityFunction;
use riskquad::consequence::expectedconsequence::{
    damage_state_probabilities,
    expected_consequence,
    ExpectedConsequence
};
use riskquad::fragility::fragilitycurve::FragilityCurve;
use riskquad::fragility::hazus::{
    HazusBridgeFragility,
    DAMAGE_RATIOS
};
use riskquad::fragility::lognormalfragility::LognormalFragility;

/// Four non-decreasing medians and a shared dispersion, so P(DS ≥ k) is
/// non-increasing in k at every intensity.
fn nested_medians() -> impl Strategy<Value = (Vec<f64>, f64)> {
    (
        0.05f64..1.0,
        prop::collection::vec(0.0f64..0.5, 3),
        0.1f64..1.0,
    )
        .prop_map(|(first, steps, dispersion)| {
            let mut median = first;
            let mut medians = vec![median];
            for step in steps {
                median += step;
                medians.push(median);
            }
            (medians, dispersion)
        })
}

fn lognormal_curves(medians: &[f64], dispersion: f64) -> Vec<Arc<dyn FragilityCurve>> {
    medians
        .iter()
        .map(|&m| Arc::new(LognormalFragility::new(m, dispersion).unwrap()) as Arc<dyn FragilityCurve>)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn state_probabilities_partition_the_damage_probability(
        (medians, dispersion) in nested_medians(),
        ims in prop::collection::vec(0.001f64..5.0, 1..20),
    ) {
        let curves = lognormal_curves(&medians, dispersion);
        let ims = DVector::from_vec(ims);
        let probabilities = damage_state_probabilities(&ims, &curves).unwrap();
        prop_assert_eq!(probabilities.ncols(), 4);
        for (row, &im) in ims.iter().enumerate() {
            let total: f64 = probabilities.row(row).sum();
            prop_assert!((total - curves[0].probability(im)).abs() <= 1e-12);
            prop_assert!(probabilities.row(row).iter().all(|&p| p >= -1e-12 && p <= 1.0 + 1e-12));
            prop_assert!(total <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn expected_consequence_is_bounded_by_the_largest_consequence(
        (medians, dispersion) in nested_medians(),
        consequences in prop::collection::vec(0.0f64..1e4, 4),
        ims in prop::collection::vec(0.001f64..5.0, 1..20),
    ) {
        let curves = lognormal_curves(&medians, dispersion);
        let ims = DVector::from_vec(ims);
        let largest = consequences.iter().cloned().fold(0.0, f64::max);
        let values = expected_consequence(&ims, &curves, &consequences).unwrap();
        prop_assert_eq!(values.len(), ims.len());
        prop_assert!(values.iter().all(|&v| v >= -1e-8 && v <= largest * (1.0 + 1e-12) + 1e-8));
    }
}

#[test]
fn identical_curves_put_all_mass_in_the_most_severe_state() {
    let unit = ExpectedConsequence::new(
        (0..4)
            .map(|_| Arc::new(LognormalFragility::new(0.30, 0.6).unwrap()) as Arc<dyn FragilityCurve>)
            .collect(),
        vec![1.0; 4],
    )
    .unwrap();
    let ims = DVector::from_vec(vec![0.1, 0.3, 0.9]);
    let probabilities = unit.damage_state_probabilities(&ims).unwrap();
    for row in 0..ims.len() {
        assert_eq!(probabilities[(row, 0)], 0.0);
        assert_eq!(probabilities[(row, 2)], 0.0);
        assert_relative_eq!(unit.evaluate(ims[row]), probabilities[(row, 3)], epsilon = 1e-15);
    }
}

#[test]
fn bridge_consequences_are_the_damage_ratios() {
    let consequence = HazusBridgeFragility::new().unwrap().expected_consequence(1.0).unwrap();
    assert_eq!(consequence.consequences().as_slice(), &DAMAGE_RATIOS);
}
