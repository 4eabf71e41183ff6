use rstest::*;

use crate::{
    candidate::Candidate,
    cfg::SolverOpts,
    error::Error,
    geodetic::ecef_to_geodetic,
    navigation::{DilutionOfPrecision, Navigation},
    prelude::Vector3,
    sv::gps_sv,
    tests::{init_logger, vector, ROVER_REFERENCE_COORDS_ECEF_M, SATELLITES_ECEF_M},
    time::gpst_epoch_from_seconds,
};

fn forward_project(rx: &Vector3<f64>, clock_bias_m: f64, sats: &[Vector3<f64>]) -> Vec<Candidate> {
    let t = gpst_epoch_from_seconds(100_010.0);
    sats.iter()
        .enumerate()
        .map(|(i, sat)| {
            Candidate::new(
                gps_sv(i as u8 + 1).unwrap(),
                t,
                *sat,
                (sat - rx).norm() + clock_bias_m,
            )
        })
        .collect()
}

fn reference_satellites() -> Vec<Vector3<f64>> {
    SATELLITES_ECEF_M.iter().map(|sat| vector(*sat)).collect()
}

#[rstest]
#[case(0.0)]
#[case(150.0)]
#[case(-3_000.0)]
#[case(299_792.458)]
fn centimeter_recovery(#[case] clock_bias_m: f64) {
    init_logger();

    let opts = SolverOpts::default();
    let rx = vector(ROVER_REFERENCE_COORDS_ECEF_M);
    let cds = forward_project(&rx, clock_bias_m, &reference_satellites());

    let solution = Navigation::new(&opts, 4, &cds).unwrap().resolve().unwrap();

    assert_eq!(solution.iterations, 10);
    assert!(
        (solution.position_m - rx).norm() < 1.0E-2,
        "error: {:?}",
        solution.position_m - rx
    );
    assert!((solution.clock_bias_m - clock_bias_m).abs() < 1.0E-2);
    assert!(solution.residual_rms_m < 1.0E-2);
    assert!(solution.degenerate.is_empty());
}

#[test]
fn overdetermined_recovery() {
    init_logger();

    let opts = SolverOpts::default();
    let rx = vector(ROVER_REFERENCE_COORDS_ECEF_M);

    let mut sats = reference_satellites();
    sats.push(Vector3::new(10_000_000.0, 15_000_000.0, 20_000_000.0));
    sats.push(Vector3::new(20_000_000.0, 5_000_000.0, 17_000_000.0));

    let cds = forward_project(&rx, 42.0, &sats);
    let solution = Navigation::new(&opts, 4, &cds).unwrap().resolve().unwrap();

    assert!((solution.position_m - rx).norm() < 1.0E-2);
    assert!((solution.clock_bias_m - 42.0).abs() < 1.0E-2);
}

#[test]
fn early_exit() {
    init_logger();

    let opts = SolverOpts::default().with_early_exit();
    let rx = vector(ROVER_REFERENCE_COORDS_ECEF_M);
    let cds = forward_project(&rx, 100.0, &reference_satellites());

    let solution = Navigation::new(&opts, 4, &cds).unwrap().resolve().unwrap();
    assert!(solution.iterations < 10);
    assert!((solution.position_m - rx).norm() < 1.0E-2);
}

#[test]
fn iteration_budget() {
    let opts = SolverOpts {
        max_iterations: 1,
        ..Default::default()
    };
    let rx = vector(ROVER_REFERENCE_COORDS_ECEF_M);
    let cds = forward_project(&rx, 0.0, &reference_satellites());

    let solution = Navigation::new(&opts, 4, &cds).unwrap().resolve().unwrap();
    assert_eq!(solution.iterations, 1);
    // a single linearization around the Earth center is far off
    assert!((solution.position_m - rx).norm() > 1.0);
}

#[test]
fn less_than_four_satellites() {
    let opts = SolverOpts::default();
    let rx = vector(ROVER_REFERENCE_COORDS_ECEF_M);
    let cds = forward_project(&rx, 0.0, &reference_satellites()[..3]);

    assert_eq!(
        Navigation::new(&opts, 4, &cds).err(),
        Some(Error::NotEnoughCandidates(3))
    );

    // minimal count is never below 4
    assert_eq!(
        Navigation::new(&opts, 1, &cds).err(),
        Some(Error::NotEnoughCandidates(3))
    );

    let cds = forward_project(&rx, 0.0, &reference_satellites());
    assert_eq!(
        Navigation::new(&opts, 5, &cds).err(),
        Some(Error::NotEnoughCandidates(4))
    );
}

#[test]
fn coplanar_geometry() {
    init_logger();

    let opts = SolverOpts::default();
    let t = gpst_epoch_from_seconds(100_010.0);

    // equatorial plane: null z sensitivity around the Earth center
    let cds = [
        (26.0E6, 0.0, 0.0),
        (0.0, 26.0E6, 0.0),
        (-26.0E6, 0.0, 0.0),
        (0.0, -26.0E6, 0.0),
    ]
    .iter()
    .enumerate()
    .map(|(i, sat)| Candidate::new(gps_sv(i as u8 + 1).unwrap(), t, vector(*sat), 2.2E7))
    .collect::<Vec<_>>();

    assert_eq!(
        Navigation::new(&opts, 4, &cds).unwrap().resolve().err(),
        Some(Error::MatrixInversion)
    );
}

#[test]
fn dilution_of_precision() {
    let opts = SolverOpts::default();
    let rx = vector(ROVER_REFERENCE_COORDS_ECEF_M);
    let cds = forward_project(&rx, 0.0, &reference_satellites());

    let solution = Navigation::new(&opts, 4, &cds).unwrap().resolve().unwrap();
    let (lat, long, _) = ecef_to_geodetic(&solution.position_m);
    let dop = DilutionOfPrecision::new(&solution.q, lat.to_radians(), long.to_radians());

    for value in [dop.gdop, dop.pdop, dop.hdop, dop.vdop, dop.tdop] {
        assert!(value.is_finite() && value > 0.0);
    }

    assert!(dop.gdop >= dop.pdop);
    assert!(dop.pdop >= dop.hdop);
    assert!(dop.pdop >= dop.vdop);
    assert!((dop.hdop.powi(2) + dop.vdop.powi(2) - dop.pdop.powi(2)).abs() < 1.0E-6);
}
