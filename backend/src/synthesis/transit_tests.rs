use rand::rngs::StdRng;
use rand::SeedableRng;

use super::transit::{synthesize_transit, DipProfile, TransitParameters};
use super::SynthesisError;

fn reference_params() -> TransitParameters {
    TransitParameters::new(10.0, 0.01, 2.0, 0.0, 100)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn test_dip_center_hits_requested_depth() {
    let series = synthesize_transit(&reference_params(), &mut rng()).unwrap();

    let at = |t: f64| {
        series
            .iter()
            .find(|s| s.time == t)
            .map(|s| s.flux)
            .expect("sample at requested time")
    };
    assert_eq!(at(5.0), 0.99);
    assert_eq!(at(15.0), 0.99);
}

#[test]
fn test_flux_is_baseline_outside_window() {
    let params = reference_params();
    let series = synthesize_transit(&params, &mut rng()).unwrap();

    for sample in series.iter() {
        let phase = sample.time % params.period_days;
        if !(4.0..=6.0).contains(&phase) {
            assert_eq!(sample.flux, 1.0, "t={} phase={}", sample.time, phase);
        }
    }
}

#[test]
fn test_length_and_monotonic_time() {
    let series = synthesize_transit(&reference_params(), &mut rng()).unwrap();
    assert_eq!(series.len(), 100);
    assert_eq!(series.samples()[0].time, 0.0);
    assert!(series.samples().windows(2).all(|w| w[0].time < w[1].time));
}

#[test]
fn test_noiseless_output_is_bit_identical() {
    let params = reference_params();
    let a = synthesize_transit(&params, &mut StdRng::seed_from_u64(1)).unwrap();
    let b = synthesize_transit(&params, &mut StdRng::seed_from_u64(2)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_seeded_noise_is_reproducible() {
    let params = reference_params().with_noise(0.0005);
    let a = synthesize_transit(&params, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = synthesize_transit(&params, &mut StdRng::seed_from_u64(42)).unwrap();
    let c = synthesize_transit(&params, &mut StdRng::seed_from_u64(43)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_noise_stays_within_amplitude() {
    let params = reference_params().with_noise(0.001);
    let noiseless = synthesize_transit(&reference_params(), &mut rng()).unwrap();
    let noisy = synthesize_transit(&params, &mut rng()).unwrap();

    for (clean, jittered) in noiseless.iter().zip(noisy.iter()) {
        assert!((jittered.flux - clean.flux).abs() <= 0.001);
    }
}

#[test]
fn test_gaussian_profile_depth_bound() {
    let params = reference_params().with_profile(DipProfile::Gaussian);
    let series = synthesize_transit(&params, &mut rng()).unwrap();
    let min = series.min_flux().unwrap();
    assert_eq!(min, 0.99);
    assert!(series.iter().all(|s| s.flux >= 1.0 - params.transit_depth));
}

#[test]
fn test_span_multiplier_controls_covered_periods() {
    let params = reference_params().with_span(1.0);
    let series = synthesize_transit(&params, &mut rng()).unwrap();
    let last = series.samples().last().unwrap().time;
    assert!(last < params.period_days);
    let dips = series.iter().filter(|s| s.flux < 1.0).count();
    assert!(dips > 0);
}

#[test]
fn test_rejects_zero_points() {
    let mut params = reference_params();
    params.num_points = 0;
    let err = synthesize_transit(&params, &mut rng()).unwrap_err();
    assert!(matches!(
        err,
        SynthesisError::InvalidParameter { parameter: "num_points", .. }
    ));
}

#[test]
fn test_rejects_non_positive_period() {
    let mut params = reference_params();
    params.period_days = 0.0;
    assert!(synthesize_transit(&params, &mut rng()).is_err());
    params.period_days = -3.0;
    assert!(synthesize_transit(&params, &mut rng()).is_err());
}

#[test]
fn test_rejects_duration_not_shorter_than_period() {
    let mut params = reference_params();
    params.transit_duration_days = 10.0;
    let err = synthesize_transit(&params, &mut rng()).unwrap_err();
    assert!(matches!(
        err,
        SynthesisError::InvalidParameter { parameter: "transit_duration_days", .. }
    ));
}

#[test]
fn test_rejects_depth_outside_unit_interval() {
    let mut params = reference_params();
    params.transit_depth = 1.0;
    assert!(synthesize_transit(&params, &mut rng()).is_err());
    params.transit_depth = 0.0;
    assert!(synthesize_transit(&params, &mut rng()).is_err());
}

#[test]
fn test_rejects_negative_noise_and_nan() {
    let params = reference_params().with_noise(-0.1);
    assert!(synthesize_transit(&params, &mut rng()).is_err());

    let mut params = reference_params();
    params.period_days = f64::NAN;
    assert!(synthesize_transit(&params, &mut rng()).is_err());
}

#[test]
fn test_rejects_time_axis_that_overflows_or_collapses() {
    let overflowing = TransitParameters::new(1e308, 0.5, 1e307, 0.0, 10).with_span(4.0);
    let err = overflowing.validate().unwrap_err();
    assert!(matches!(
        err,
        SynthesisError::InvalidParameter { parameter: "span_multiplier", .. }
    ));
    assert!(synthesize_transit(&overflowing, &mut rng()).is_err());

    let collapsed = reference_params().with_span(1e-323);
    assert!(collapsed.validate().is_err());
    assert!(synthesize_transit(&collapsed, &mut rng()).is_err());
}

#[test]
fn test_huge_but_finite_window_keeps_times_increasing() {
    let params = TransitParameters::new(1e300, 0.5, 1e299, 0.0, 10).with_span(4.0);
    let series = synthesize_transit(&params, &mut rng()).unwrap();
    let times = series.times();
    assert!(times.iter().all(|t| t.is_finite()));
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_parameters_deserialize_with_defaults() {
    let json = r#"{
        "period_days": 3.886,
        "transit_depth": 0.0042,
        "transit_duration_days": 0.05,
        "noise_level": 0.0002,
        "num_points": 200
    }"#;
    let params: TransitParameters = serde_json::from_str(json).unwrap();
    assert_eq!(params.span_multiplier, 2.0);
    assert_eq!(params.profile, DipProfile::Cosine);
    assert!(params.validate().is_ok());
}
