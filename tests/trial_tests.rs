//! End-to-end trial tests

use checkout_sim::simulation::{
    run_trial, CustomerProfile, SimError, Trial, TrialParams, TrialState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn profile() -> CustomerProfile {
    CustomerProfile::default()
}

#[test]
fn test_invalid_params_are_rejected() {
    let cases = [
        (TrialParams::new(0, 0, 0, 10.0, 1.0), "lane_count"),
        (TrialParams::new(2, 3, 0, 10.0, 1.0), "express_lane_count"),
        (TrialParams::new(2, 0, 0, 0.0, 1.0), "time_horizon"),
        (TrialParams::new(2, 0, 0, f64::INFINITY, 1.0), "time_horizon"),
        (TrialParams::new(2, 0, 0, 10.0, -1.0), "arrival_rate"),
        (TrialParams::new(2, 0, 0, 10.0, f64::NAN), "arrival_rate"),
    ];

    for (params, field) in cases {
        let mut rng = StdRng::seed_from_u64(0);
        match run_trial(&params, &profile(), &mut rng) {
            Err(SimError::InvalidParameter { name, .. }) => assert_eq!(name, field),
            other => panic!("expected invalid {}, got {:?}", field, other),
        }
    }
}

#[test]
fn test_lanes_are_built_express_first() {
    let params = TrialParams::new(4, 2, 7, 10.0, 1.0);
    let trial = Trial::new(params.clone(), profile()).unwrap();
    assert_eq!(trial.params(), &params);

    let express: Vec<Option<u32>> = trial.lanes().iter().map(|l| l.express_limit()).collect();
    assert_eq!(express, vec![Some(7), Some(7), None, None]);
    assert_eq!(trial.state(), TrialState::Running);
    assert_eq!(trial.time(), 0.0);
}

#[test]
fn test_low_arrival_rate_gives_short_waits() {
    let params = TrialParams::new(1, 0, 0, 100.0, 0.01);
    let profile = profile();
    let bound = 10.0 * profile.mean_service_time();

    let mut finished = Vec::new();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        match run_trial(&params, &profile, &mut rng) {
            Ok(average) => {
                assert!(average.is_finite());
                assert!(average > 0.0 && average < bound, "average wait {}", average);
                finished.push(average);
            }
            // A lone arrival that lands past the horizon never gets served
            Err(SimError::NoCustomersProcessed) => {}
            Err(err) => panic!("unexpected error {:?}", err),
        }
    }

    assert!(!finished.is_empty());
    // With an empty lane, a customer's wait is just their own service time
    let mean = finished.iter().sum::<f64>() / finished.len() as f64;
    assert!(mean < 2.0 * profile.mean_service_time(), "mean wait {}", mean);
}

#[test]
fn test_zero_completions_is_an_error() {
    let params = TrialParams::new(1, 0, 0, 1e-6, 1.0);
    let mut rng = StdRng::seed_from_u64(9);

    assert_eq!(
        run_trial(&params, &profile(), &mut rng),
        Err(SimError::NoCustomersProcessed)
    );
}

#[test]
fn test_all_express_lanes_can_reject_customers() {
    let mut trial = Trial::new(TrialParams::new(2, 2, 0, 10.0, 1.0), profile()).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    assert!(matches!(
        trial.step(&mut rng),
        Err(SimError::NoEligibleLane { .. })
    ));
    assert_eq!(trial.state(), TrialState::Done);
    assert_eq!(trial.customers_arrived(), 0);
}

#[test]
fn test_rejected_arrival_ends_trial_with_consistent_clock() {
    // Customers above 30 items have nowhere to go
    let params = TrialParams::new(1, 1, 30, 1000.0, 1.0);
    let mut trial = Trial::new(params, profile()).unwrap();
    let mut rng = StdRng::seed_from_u64(21);

    let mut served_time = 0.0;
    let err = loop {
        let before = trial.time();
        match trial.step(&mut rng) {
            Ok(true) => served_time += trial.time() - before,
            Ok(false) => panic!("trial ended before any customer was rejected"),
            Err(err) => {
                served_time += trial.time() - before;
                break err;
            }
        }
    };

    assert!(matches!(err, SimError::NoEligibleLane { item_count } if item_count > 30));
    assert_eq!(trial.state(), TrialState::Done);
    assert!(trial.time() > 0.0);
    assert!((trial.time() - served_time).abs() < 1e-9);

    // Further steps neither draw arrivals nor move any clock
    let time = trial.time();
    let arrived = trial.customers_arrived();
    let time_left: Vec<f64> = trial.lanes().iter().map(|l| l.total_time_left()).collect();
    for _ in 0..50 {
        assert_eq!(trial.step(&mut rng), Ok(false));
    }
    assert_eq!(trial.time(), time);
    assert_eq!(trial.customers_arrived(), arrived);
    let after: Vec<f64> = trial.lanes().iter().map(|l| l.total_time_left()).collect();
    assert_eq!(after, time_left);
}

#[test]
fn test_closed_express_lane_matches_single_lane() {
    let with_express = TrialParams::new(2, 1, 0, 120.0, 0.3);
    let single = TrialParams::new(1, 0, 0, 120.0, 0.3);

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut trial = Trial::new(with_express.clone(), profile()).unwrap();
        while trial.step(&mut rng).unwrap() {
            assert!(trial.lanes()[0].is_empty(), "express lane admitted a customer");
        }
        let express_outcome = trial.finish();

        let mut rng = StdRng::seed_from_u64(seed);
        let single_outcome = Trial::new(single.clone(), profile()).unwrap().run(&mut rng);

        assert_eq!(express_outcome, single_outcome);
    }
}

#[test]
fn test_wait_time_never_decreases() {
    let params = TrialParams::new(3, 1, 10, 240.0, 1.5);
    let mut trial = Trial::new(params, profile()).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let mut previous = 0.0;

    while trial.step(&mut rng).unwrap() {
        let total = trial.stats().total_wait_time;
        assert!(total >= 0.0);
        assert!(total >= previous);
        previous = total;

        for lane in trial.lanes() {
            assert!((lane.total_time_left() - lane.recomputed_time_left()).abs() < 1e-6);
        }
    }
}

#[test]
fn test_horizon_truncation() {
    let params = TrialParams::new(2, 0, 0, 60.0, 2.0);
    let mut trial = Trial::new(params, profile()).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    while trial.step(&mut rng).unwrap() {}
    assert_eq!(trial.state(), TrialState::Done);
    assert!(trial.time() >= 60.0);

    // Stepping a finished trial does nothing
    let time = trial.time();
    let arrived = trial.customers_arrived();
    assert!(!trial.step(&mut rng).unwrap());
    assert_eq!(trial.time(), time);
    assert_eq!(trial.customers_arrived(), arrived);

    let outcome = trial.finish().unwrap();
    assert_eq!(
        outcome.customers_arrived,
        outcome.customers_processed + outcome.customers_unfinished as u64
    );
    assert!(outcome.elapsed >= 60.0);
    assert!(
        (outcome.average_wait_time * outcome.customers_processed as f64
            - outcome.total_wait_time)
            .abs()
            < 1e-6
    );
}

#[test]
fn test_same_seed_same_result() {
    let params = TrialParams::default();
    let mut first = StdRng::seed_from_u64(77);
    let mut second = StdRng::seed_from_u64(77);

    assert_eq!(
        run_trial(&params, &profile(), &mut first),
        run_trial(&params, &profile(), &mut second)
    );
}

#[test]
fn test_more_lanes_reduce_waits_under_load() {
    let mut crowded = Vec::new();
    let mut spacious = Vec::new();
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        crowded.push(run_trial(&TrialParams::new(2, 0, 0, 120.0, 2.0), &profile(), &mut rng).unwrap());
        let mut rng = StdRng::seed_from_u64(seed);
        spacious.push(run_trial(&TrialParams::new(10, 0, 0, 120.0, 2.0), &profile(), &mut rng).unwrap());
    }

    let crowded_mean = crowded.iter().sum::<f64>() / crowded.len() as f64;
    let spacious_mean = spacious.iter().sum::<f64>() / spacious.len() as f64;
    assert!(
        crowded_mean > 2.0 * spacious_mean,
        "crowded {} vs spacious {}",
        crowded_mean,
        spacious_mean
    );
}
