use super::*;

fn params(flow_rate: f64) -> EmitterParams {
    EmitterParams {
        flow_rate,
        nozzle_radius: 12.0,
        size: DropletSize {
            mean: 1.6,
            sigma: 0.6,
            min: 0.6,
            max: 3.0,
        },
    }
}

#[test]
fn droplet_count_floors_and_caps() {
    assert_eq!(droplet_count(2500.0, 0.0), 0);
    assert_eq!(droplet_count(2500.0, 0.01), 25);
    assert_eq!(droplet_count(100.0, 0.019), 1);
    assert_eq!(droplet_count(10_000_000.0, 1.0), MAX_DROPLETS_PER_FRAME);
    assert_eq!(droplet_count(f64::INFINITY, 1.0), 0);
    assert_eq!(droplet_count(-5.0, 1.0), 0);
}

#[test]
fn frame_cap_limits_attempts() {
    let mut e = Emitter::new(params(10_000_000.0), 1);
    let mut out = Vec::new();
    let stats = e.emit(450.0, 1.0, 300.0, &mut out);
    assert_eq!(stats.attempted, 5000);
    assert!(stats.drawn <= 5000);
    assert_eq!(stats.drawn, out.len());
}

#[test]
fn equal_seeds_emit_identical_batches() {
    let mut a = Emitter::new(params(2500.0), 99);
    let mut b = Emitter::new(params(2500.0), 99);
    let (mut oa, mut ob) = (Vec::new(), Vec::new());
    for (i, dt) in [0.016, 0.033, 0.0, 0.05, 0.016].into_iter().enumerate() {
        let nx = i as f64 * 10.0;
        a.emit(nx, dt, 300.0, &mut oa);
        b.emit(nx, dt, 300.0, &mut ob);
        assert_eq!(oa.len(), ob.len());
        for (da, db) in oa.iter().zip(&ob) {
            assert_eq!(da.center.x.to_bits(), db.center.x.to_bits());
            assert_eq!(da.center.y.to_bits(), db.center.y.to_bits());
            assert_eq!(da.radius.to_bits(), db.radius.to_bits());
        }
    }
}

#[test]
fn droplets_stay_vertically_in_bounds() {
    let mut e = Emitter::new(params(100_000.0), 3);
    let mut out = Vec::new();
    e.emit(0.0, 0.05, 240.0, &mut out);
    assert!(!out.is_empty());
    for d in &out {
        assert!((0.0..=240.0).contains(&d.center.y), "y = {}", d.center.y);
    }
}

#[test]
fn horizontal_spread_tracks_nozzle_radius() {
    let mut e = Emitter::new(params(100_000.0), 5);
    let mut out = Vec::new();
    e.emit(500.0, 0.05, 300.0, &mut out);
    let n = out.len() as f64;
    let mean = out.iter().map(|d| d.center.x).sum::<f64>() / n;
    let sd = (out.iter().map(|d| (d.center.x - mean).powi(2)).sum::<f64>() / n).sqrt();
    assert!((mean - 500.0).abs() < 3.0, "mean {mean}");
    // sigma = nozzle_radius * 2.0
    assert!((sd - 24.0).abs() < 3.0, "sd {sd}");
}

#[test]
fn radius_bounds_hold_over_many_samples() {
    let mut e = Emitter::new(params(0.0), 11);
    for i in 0..10_000 {
        let nd = (i % 101) as f64 / 100.0;
        let kind = if i % 2 == 0 {
            DropletKind::Scattered
        } else {
            DropletKind::Fill
        };
        let r = e.sample_radius(kind, nd);
        assert!(r >= MIN_DROPLET_RADIUS, "r = {r}");
        assert!(r <= 3.0, "r = {r}");
    }
}

#[test]
fn radius_floor_wins_for_tiny_distributions() {
    let mut p = params(0.0);
    p.size = DropletSize {
        mean: 0.01,
        sigma: 0.0,
        min: 0.01,
        max: 0.3,
    };
    let mut e = Emitter::new(p, 1);
    for _ in 0..100 {
        let r = e.sample_radius(DropletKind::Scattered, 1.0);
        assert_eq!(r, MIN_DROPLET_RADIUS);
    }
}

#[test]
fn acceptance_is_one_at_centre_and_floor_at_edge() {
    assert!((acceptance_probability(0.0) - 1.0).abs() < 1e-12);
    assert!((acceptance_probability(1.0) - 0.2).abs() < 1e-12);
    assert!(acceptance_probability(0.5) > 0.2);
    assert!(acceptance_probability(0.5) < 1.0);
}

#[test]
fn normalized_distance_is_zero_at_centre_one_at_edges() {
    assert_eq!(normalized_distance(150.0, 300.0), 0.0);
    assert_eq!(normalized_distance(0.0, 300.0), 1.0);
    assert_eq!(normalized_distance(300.0, 300.0), 1.0);
    assert_eq!(normalized_distance(75.0, 300.0), 0.5);
}
