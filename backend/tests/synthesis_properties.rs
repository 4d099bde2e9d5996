//! Property tests for the light-curve generators and their input types.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use transit_quest::models::{AnswerSet, FluxAxisRange, SearchFilters, BASELINE_FLUX, QUESTION_COUNT};
use transit_quest::models::stellar::{DISTANCE_CATEGORIES, SIZE_CATEGORIES, STELLAR_CLASSES};
use transit_quest::synthesis::{
    synthesize_periodogram, synthesize_transit, PeriodogramParams, TransitParameters,
};

fn transit_params() -> impl Strategy<Value = TransitParameters> {
    (
        0.5f64..50.0,
        0.0005f64..0.2,
        0.01f64..0.9,
        0.0f64..0.01,
        1usize..400,
        0.5f64..4.0,
    )
        .prop_map(|(period, depth, duration_fraction, noise, points, span)| {
            TransitParameters::new(period, depth, period * duration_fraction, noise, points)
                .with_span(span)
        })
}

proptest! {
    #[test]
    fn transit_has_requested_length_and_ordered_times(params in transit_params(), seed in any::<u64>()) {
        let series = synthesize_transit(&params, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(series.len(), params.num_points);
        let times = series.times();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(times[0], 0.0);
    }

    #[test]
    fn transit_noise_stays_within_level(params in transit_params(), seed in any::<u64>()) {
        let series = synthesize_transit(&params, &mut StdRng::seed_from_u64(seed)).unwrap();
        for sample in series.iter() {
            let model = params.model_flux(sample.time);
            prop_assert!((sample.flux - model).abs() <= params.noise_level + 1e-12);
        }
    }

    #[test]
    fn noiseless_transit_bounded_by_depth(params in transit_params()) {
        let params = params.with_noise(0.0);
        let series = synthesize_transit(&params, &mut StdRng::seed_from_u64(0)).unwrap();
        for flux in series.fluxes() {
            prop_assert!(flux <= BASELINE_FLUX);
            prop_assert!(flux >= BASELINE_FLUX - params.transit_depth - 1e-12);
        }
    }

    #[test]
    fn axis_range_covers_series(params in transit_params(), seed in any::<u64>()) {
        let series = synthesize_transit(&params, &mut StdRng::seed_from_u64(seed)).unwrap();
        let axis = FluxAxisRange::for_series(&series);
        prop_assert!(series.fluxes().iter().all(|f| axis.contains(*f)));
        prop_assert!(axis.min <= 0.992 && axis.max >= 1.002);
    }

    #[test]
    fn periodogram_power_is_normalized(period in 0.1f64..40.0, seed in any::<u64>()) {
        let params = PeriodogramParams::default();
        let points = synthesize_periodogram(period, &params, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(points.len(), params.trial_count());
        prop_assert!(points.iter().all(|p| (0.0..=1.0).contains(&p.power)));
    }

    #[test]
    fn slider_values_always_land_in_tables(
        distance in -10.0f64..20.0,
        temperature in -10.0f64..20.0,
        size in -10.0f64..20.0,
    ) {
        let filters = SearchFilters::from_sliders(distance, temperature, size);
        prop_assert!(filters.distance_index < DISTANCE_CATEGORIES.len());
        prop_assert!(filters.temperature_index < STELLAR_CLASSES.len());
        prop_assert!(filters.size_index < SIZE_CATEGORIES.len());
    }

    #[test]
    fn out_of_range_answers_are_rejected(index in 4usize..1000) {
        let mut answers = AnswerSet::new(QUESTION_COUNT);
        prop_assert!(!answers.set(index, None));
        prop_assert_eq!(answers.get(index), None);
        prop_assert_eq!(answers.answered_count(), 0);
    }
}
