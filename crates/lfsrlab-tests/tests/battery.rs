//! Battery behaviour on sequences produced by the core engine.

use lfsrlab_core::{Lfsr, geffe};
use lfsrlab_tests::{BatteryConfig, PValue, monobit, run_battery, runs};

#[test]
fn maximal_length_sequence_is_balanced() {
    let mut state = vec![0u8; 10];
    state[9] = 1;
    let bits = Lfsr::from_taps(&[10, 3], &state).unwrap().run(1023);

    // One full period: 512 ones, 511 zeros, ideal run distribution.
    let m = monobit(&bits);
    assert!((m.p_value.value() - 0.975058).abs() < 1e-5, "{:?}", m.p_value);
    let r = runs(&bits);
    assert!((r.p_value.value() - 0.975034).abs() < 1e-5, "{:?}", r.p_value);
}

#[test]
fn short_period_register_fails_everything() {
    // {4, 2} is reducible: from [1,0,0,0] the output repeats 000101.
    let bits = Lfsr::from_taps(&[4, 2], &[1, 0, 0, 0]).unwrap().run(20_000);
    assert_eq!(&bits[..12], &[0, 0, 0, 1, 0, 1, 0, 0, 0, 1, 0, 1]);

    let results = run_battery(&bits, &BatteryConfig::default());
    assert_eq!(results.len(), 9);
    for r in &results {
        assert!(!r.passed(0.01), "{} passed with {:?}", r.name, r.p_value);
    }
    // Proportion 1/3 fails the runs pre-test outright.
    assert_eq!(results[2].p_value, PValue::Inapplicable);
}

#[test]
fn combiner_output_yields_a_full_report() {
    let a = Lfsr::from_taps(&[7, 1], &[1, 0, 0, 0, 0, 0, 0]).unwrap().run(8000);
    let b = Lfsr::from_taps(&[5, 2], &[1, 0, 0, 0, 0]).unwrap().run(8000);
    let c = Lfsr::from_taps(&[4, 1], &[1, 0, 0, 0]).unwrap().run(8000);
    let z = geffe(&a, &b, &c);

    let config = BatteryConfig::default();
    let results = run_battery(&z, &config);
    let ids: Vec<String> = results.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, config.test_ids());
    for r in &results {
        let p = r.p_value.value();
        assert!((0.0..=1.0).contains(&p), "{}: {p}", r.id);
    }
    // 8000 bits leave 693 Maurer blocks after the 640-block warm-up.
    assert!(results[6].p_value.is_applicable());
}
