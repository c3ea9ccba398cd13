//! Integration tests for the one-shot calculators.
//!
//! Worked examples a photographer would check by hand, run through the
//! public API of darkroom-core and darkroom-exposure.

use darkroom_core::{format_shutter, parse_shutter, APERTURES, ISOS, SHUTTERS};
use darkroom_exposure::{
    exposure_value, parse_ratio, reciprocity, resolve, thermal, DilutionRequest, ExposureError,
    ExposureSettings, PriorityMode, ProcessTimetable, ReciprocityModel,
};
use proptest::prelude::*;

// ── Exposure resolution ────────────────────────────────────────

#[test]
fn iso400_f28_at_ev12_resolves_to_1_2000() {
    let t = resolve(12.0, 400.0, PriorityMode::ApertureFixed, 2.8).unwrap();
    assert_eq!(format_shutter(t), "1/2000");
}

#[test]
fn dial_strings_feed_the_resolver() {
    let shutter = parse_shutter("1/125").unwrap();
    let n = resolve(12.0, 400.0, PriorityMode::ShutterFixed, shutter).unwrap();
    // sqrt(0.008 × 400 × 4096 / 100) ≈ 11.4
    assert_eq!(n, 11.0);
}

#[test]
fn resolved_pair_meters_close_to_requested_ev() {
    let settings = ExposureSettings::new(100.0, PriorityMode::ApertureFixed, 8.0, 1.0 / 125.0)
        .unwrap();
    for ev in [6.0, 9.0, 12.0, 15.0] {
        let pair = darkroom_exposure::resolve_pair(ev, &settings).unwrap();
        let metered = exposure_value(pair.aperture, pair.shutter, settings.iso()).unwrap();
        // Snapping to whole stops costs at most about half a stop, plus the
        // 1/60 and 1/15 rounding on the shutter dial.
        assert!((metered - ev).abs() < 0.6, "ev {} metered {}", ev, metered);
    }
}

#[test]
fn scale_violations_are_reported_not_clamped() {
    let err = resolve(12.0, 250.0, PriorityMode::ApertureFixed, 2.8).unwrap_err();
    assert_eq!(err.to_string(), "250 is not a standard ISO value");
}

// ── Reciprocity ────────────────────────────────────────────────

#[test]
fn thirty_second_exposure_at_p_1_35() {
    let adjusted = reciprocity::compensate(30.0, 1.35).unwrap();
    assert!((adjusted - 98.65).abs() < 0.05);
    assert_eq!(format_shutter(adjusted), "98.7\"");
}

#[test]
fn delta_400_needs_more_than_hp5() {
    let hp5 = ReciprocityModel::find("Ilford HP5+").unwrap();
    let delta = ReciprocityModel::find("Ilford Delta 400").unwrap();
    assert!(delta.adjusted_time(20.0).unwrap() > hp5.adjusted_time(20.0).unwrap());
}

// ── Development timing ─────────────────────────────────────────

#[test]
fn six_minute_developer_at_24c() {
    let adjusted = thermal::compensate(360, 20.0, 24.0).unwrap();
    assert_eq!(adjusted, 247);
    assert_eq!(thermal::format_duration(adjusted), "4:07");
}

#[test]
fn out_of_range_bath_is_rejected() {
    let table = ProcessTimetable::black_and_white(360);
    assert!(matches!(
        table.compensated(55.0),
        Err(ExposureError::TemperatureOutOfRange { .. })
    ));
}

// ── Dilution ───────────────────────────────────────────────────

#[test]
fn five_hundred_ml_at_1_plus_25() {
    let ratio = parse_ratio("1+25").unwrap();
    let d = DilutionRequest::new(500.0, ratio).compute().unwrap();
    assert!((d.concentrate - 19.2).abs() < 0.05);
    assert!((d.water - 480.8).abs() < 0.05);
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_scale_lookup_is_stable(x in -100.0f64..100_000.0) {
        for scale in [APERTURES, SHUTTERS, ISOS] {
            let a = scale.nearest(x);
            let b = scale.nearest(x);
            prop_assert_eq!(a, b);
            prop_assert!(scale.contains(a));
        }
    }

    #[test]
    fn reciprocity_identity_at_one_second(p in -3.0f64..3.0) {
        prop_assert_eq!(reciprocity::compensate(1.0, p).unwrap(), 1.0);
    }

    #[test]
    fn dilution_conserves_volume(total in 0.0f64..5000.0, ratio in 0.0f64..200.0) {
        let d = DilutionRequest::new(total, ratio).compute().unwrap();
        prop_assert!((d.concentrate + d.water - total).abs() < 1e-6);
    }
}
