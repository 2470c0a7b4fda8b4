use approx::assert_abs_diff_eq;
use std::io::Cursor;

use crate::cluster::{
    kmeans, squared_distance, write_report, ClusterConfig, ClusterEngine, ControlFile, Dataset,
    Seeding,
};
use crate::error::Error;

fn two_groups() -> Dataset {
    Dataset::parse(Cursor::new("2\n0 0 A\n0 1 A\n10 10 B\n10 11 B\n"), true).unwrap()
}

/// Deterministic pseudo-random points around a few centres.
fn blobs(n: usize) -> Dataset {
    let centres = [[0.0, 0.0, 0.0], [5.0, 5.0, 0.0], [0.0, 8.0, 3.0], [9.0, 1.0, 7.0]];
    let rows: Vec<[f64; 3]> = (0..n)
        .map(|i| {
            let c = centres[i % centres.len()];
            let jitter = |s: usize| ((i * s) % 97) as f64 / 97.0 - 0.5;
            [c[0] + jitter(13), c[1] + jitter(29), c[2] + jitter(53)]
        })
        .collect();
    Dataset::from_rows(&rows).unwrap()
}

#[test]
fn test_two_group_scenario_first_k() {
    let data = two_groups();
    let result = kmeans(
        &data,
        ClusterConfig::new(2)
            .with_seeding(Seeding::FirstK)
            .with_tolerance(0.01),
    )
    .unwrap();

    // Seeds (0,0) and (0,1) first pull both far points into cluster 1, the
    // second pass moves (0,1) back, and the third pass sees no movement.
    assert_eq!(result.iterations, 3);
    assert!(result.converged);
    assert_eq!(result.assignments, vec![0, 0, 1, 1]);
    assert_abs_diff_eq!(result.means.row(0)[0], 0.0);
    assert_abs_diff_eq!(result.means.row(0)[1], 0.5);
    assert_abs_diff_eq!(result.means.row(1)[0], 10.0);
    assert_abs_diff_eq!(result.means.row(1)[1], 10.5);

    let clusters = result.clusters();
    assert_eq!(clusters[0].len(), 2);
    assert_eq!(clusters[1].len(), 2);
    assert!(clusters[0].members.iter().all(|&m| data.label(m) == "A"));
    assert!(clusters[1].members.iter().all(|&m| data.label(m) == "B"));
}

#[test]
fn test_two_group_scenario_plus_plus() {
    let data = two_groups();
    for seed in 0..10 {
        let result = kmeans(
            &data,
            ClusterConfig::new(2).with_seed(seed).with_tolerance(0.01),
        )
        .unwrap();
        let sizes: Vec<usize> = result.clusters().iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 2], "seed {}", seed);
        assert_eq!(result.assignments[0], 0);
    }
}

#[test]
fn test_single_thread_runs_are_identical() {
    let data = blobs(400);
    let config = ClusterConfig::new(4).with_seed(2024).with_tolerance(1e-6);
    let a = kmeans(&data, config.clone()).unwrap();
    let b = kmeans(&data, config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_thread_count_invariance_every_iteration() {
    let data = blobs(301);
    let base = ClusterConfig::new(4).with_seed(11).with_tolerance(1e-9);

    let mut reference = ClusterEngine::new(base.clone()).unwrap();
    let mut others: Vec<ClusterEngine> = [2, 4, data.len()]
        .iter()
        .map(|&t| ClusterEngine::new(base.clone().with_threads(t)).unwrap())
        .collect();

    loop {
        let done = reference.iterate(&data).unwrap();
        for engine in others.iter_mut() {
            assert_eq!(engine.iterate(&data).unwrap(), done);
            assert_eq!(engine.assignments(), reference.assignments());
            assert_eq!(engine.means(), reference.means());
        }
        if done {
            break;
        }
    }
}

#[test]
fn test_final_assignment_is_nearest_mean() {
    let data = blobs(250);
    let result = kmeans(&data, ClusterConfig::new(4).with_seed(8).with_tolerance(1e-8)).unwrap();
    for (i, &assigned) in result.assignments.iter().enumerate() {
        let point = data.attributes(i);
        let own = squared_distance(point, result.means.row(assigned));
        for (c, mean) in result.means.rows().enumerate() {
            let other = squared_distance(point, mean);
            assert!(own <= other, "instance {} closer to {} than {}", i, c, assigned);
            if other == own {
                assert!(assigned <= c);
            }
        }
    }
}

#[test]
fn test_shift_is_non_negative_and_below_tolerance_at_stop() {
    let data = blobs(120);
    let tolerance = 1e-3;
    let mut engine = ClusterEngine::new(
        ClusterConfig::new(3)
            .with_seeding(Seeding::FirstK)
            .with_tolerance(tolerance),
    )
    .unwrap();
    loop {
        let done = engine.iterate(&data).unwrap();
        let shift = engine.last_shift().unwrap();
        assert!(shift >= 0.0);
        assert_eq!(done, shift < tolerance);
        if done {
            break;
        }
    }
}

#[test]
fn test_empty_cluster_reset_to_origin() {
    // Two identical seeds: every instance ties and goes to cluster 0.
    let data = Dataset::from_rows(&[[3.0, 3.0], [3.0, 3.0], [5.0, 5.0]]).unwrap();
    let mut engine = ClusterEngine::new(
        ClusterConfig::new(2)
            .with_seeding(Seeding::FirstK)
            .with_tolerance(0.01),
    )
    .unwrap();
    engine.iterate(&data).unwrap();
    assert_eq!(engine.assignments(), &[0, 0, 0]);
    let means = engine.means().unwrap();
    assert_eq!(means.row(1), &[0.0, 0.0]);
}

#[test]
fn test_k_equals_instance_count() {
    let data = two_groups();
    let result = kmeans(&data, ClusterConfig::new(4).with_seed(5)).unwrap();
    let mut sorted = result.assignments.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2, 3]);
}

#[test]
fn test_empty_dataset_is_degenerate() {
    let data = Dataset::new(2).unwrap();
    assert!(matches!(
        kmeans(&data, ClusterConfig::new(1)),
        Err(Error::DegenerateInput(_))
    ));
}

#[test]
fn test_control_to_report() {
    let control = ControlFile::parse(
        "#k-count 2 #use-labels 1 #plus-plus 0 #tolerance 0.01 #num-threads 2 #EOF",
    )
    .unwrap();
    let data = Dataset::parse(
        Cursor::new("2\n0 0 A\n0 1 A\n10 10 B\n10 11 B\n"),
        control.cluster.use_labels,
    )
    .unwrap();
    let result = kmeans(&data, control.cluster).unwrap();

    let mut out = Vec::new();
    write_report(&mut out, &result, &data).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Cluster #1 with mean 0 0.5  and member count 2\n0 0  A\n0 1  A\n"));
    assert!(text.contains("Cluster #2 with mean 10 10.5  and member count 2\n10 10  B\n10 11  B\n"));
}

#[test]
fn test_non_finite_tokens_do_not_reach_the_engine() {
    let data = Dataset::parse(Cursor::new("1\n0\nnan\n5\n"), false).unwrap();
    assert_eq!(data.len(), 2);
    let result = kmeans(&data, ClusterConfig::new(2).with_seed(1)).unwrap();
    assert!(result.converged);
    assert!(result.shift.is_finite());
    assert_eq!(result.assignments, vec![0, 1]);
}

#[test]
fn test_overflowing_plus_plus_weights_are_an_error() {
    let data = Dataset::from_rows(&[[-1e160], [1e160], [0.0]]).unwrap();
    assert!(matches!(
        kmeans(&data, ClusterConfig::new(2).with_seed(1)),
        Err(Error::DegenerateInput(_))
    ));
}
