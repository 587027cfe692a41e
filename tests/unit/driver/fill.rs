use super::*;
use crate::mask::spec::MaskSpec;
use kurbo::Shape as _;

fn config(json: &str) -> SprayConfig {
    SprayConfig::from_json_str(json).unwrap()
}

fn attached(json: &str) -> SprayFill {
    let mut fill = SprayFill::new(config(json), VirtualScheduler::new(16.0)).unwrap();
    fill.attach(1.0).unwrap();
    fill
}

#[test]
fn new_rejects_invalid_config() {
    let cfg = SprayConfig {
        width: 0.0,
        ..SprayConfig::default()
    };
    assert!(SprayFill::new(cfg, VirtualScheduler::default()).is_err());
}

#[test]
fn start_is_noop_without_surface() {
    let mut fill = SprayFill::new(SprayConfig::default(), VirtualScheduler::default()).unwrap();
    fill.start();
    assert!(!fill.is_running());
    assert_eq!(fill.pending_frame(), None);
    assert_eq!(fill.step_virtual(), None);
    assert!(fill.snapshot().is_none());
}

#[test]
fn first_frame_has_zero_dt_then_advances() {
    let mut fill = attached(r#"{"width": 200, "height": 50, "seed": 3}"#);
    fill.start();
    let first = fill.step_virtual().unwrap();
    assert_eq!(first.dt, 0.0);
    assert_eq!(first.nozzle_x, 0.0);
    assert_eq!(first.emitted, 0);

    let second = fill.step_virtual().unwrap();
    assert!((second.dt - 0.016).abs() < 1e-12);
    assert!((second.nozzle_x - 220.0 * 0.016).abs() < 1e-9);
    assert_eq!(second.emitted, 40);
    assert!(second.running);
}

#[test]
fn large_gaps_are_clamped() {
    let mut fill =
        SprayFill::new(config(r#"{"width": 400, "height": 50}"#), VirtualScheduler::new(1000.0))
            .unwrap();
    fill.attach(1.0).unwrap();
    fill.start();
    fill.step_virtual().unwrap();
    let stats = fill.step_virtual().unwrap();
    assert_eq!(stats.dt, MAX_FRAME_DT);
    assert!((stats.nozzle_x - 220.0 * MAX_FRAME_DT).abs() < 1e-9);
    assert_eq!(stats.emitted, 125);
}

#[test]
fn pause_cancels_pending_and_start_resumes() {
    let mut fill = attached(r#"{"width": 300, "height": 50}"#);
    fill.start();
    fill.step_virtual().unwrap();
    fill.step_virtual().unwrap();
    let x = fill.nozzle().x;

    fill.pause();
    assert!(!fill.is_running());
    assert_eq!(fill.pending_frame(), None);
    assert_eq!(fill.scheduler().pending(), None);
    assert_eq!(fill.step_virtual(), None);
    fill.pause();

    fill.start();
    let resumed = fill.step_virtual().unwrap();
    assert_eq!(resumed.dt, 0.0);
    assert_eq!(resumed.nozzle_x, x);
}

#[test]
fn stale_requests_are_ignored() {
    let mut fill = attached(r#"{"width": 300, "height": 50}"#);
    fill.start();
    let (first, ts) = fill.scheduler_mut().fire_next().unwrap();
    assert!(fill.on_frame(first, ts).is_some());
    assert!(fill.on_frame(first, ts + 16.0).is_none());
    assert!(fill.on_frame(FrameRequest(9999), ts + 16.0).is_none());
    assert!(fill.pending_frame().is_some());
}

#[test]
fn non_looping_sweep_stops_at_far_edge() {
    let mut fill = attached(r#"{"width": 100, "height": 40}"#);
    fill.start();
    let frames = run_virtual(&mut fill, 1000);
    let last = frames.last().unwrap();
    assert_eq!(last.outcome, SweepOutcome::Finished);
    assert!(!last.running);
    assert_eq!(last.nozzle_x, 100.0);
    assert!(!fill.is_running());
    assert_eq!(fill.pending_frame(), None);
    assert_eq!(fill.scheduler().pending(), None);
}

#[test]
fn looping_sweep_reverses_at_boundaries() {
    let mut fill = attached(r#"{"width": 100, "height": 40, "loop": true}"#);
    fill.start();
    let frames = run_virtual(&mut fill, 200);
    assert_eq!(frames.len(), 200);
    assert!(fill.is_running());

    let reversals: Vec<_> = frames
        .iter()
        .filter(|f| f.outcome == SweepOutcome::Reversed)
        .collect();
    assert!(reversals.len() >= 2);
    assert_eq!(reversals[0].nozzle_x, 100.0);
    assert_eq!(reversals[0].direction, SweepDirection::RightToLeft);
    assert_eq!(reversals[1].nozzle_x, 0.0);
    assert_eq!(reversals[1].direction, SweepDirection::LeftToRight);
    assert!(frames.iter().all(|f| (0.0..=100.0).contains(&f.nozzle_x)));
}

#[test]
fn reset_restores_background_and_start_position() {
    let mut fill = attached(r##"{"width": 120, "height": 40, "background": "#ff0000"}"##);
    fill.start();
    run_virtual(&mut fill, 10);
    fill.set_sweep_direction(SweepDirection::RightToLeft);

    fill.reset();
    assert!(!fill.is_running());
    assert_eq!(fill.pending_frame(), None);
    assert_eq!(fill.direction(), SweepDirection::LeftToRight);
    assert_eq!(fill.nozzle(), Point::new(0.0, 20.0));

    let snap = fill.snapshot().unwrap();
    assert!(snap.data.chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn set_direction_does_not_move_nozzle() {
    let mut fill = attached(r#"{"width": 300, "height": 40}"#);
    fill.start();
    run_virtual(&mut fill, 5);
    let x = fill.nozzle().x;

    fill.set_sweep_direction(SweepDirection::RightToLeft);
    assert_eq!(fill.nozzle().x, x);
    let next = fill.step_virtual().unwrap();
    assert!(next.nozzle_x < x);
}

#[test]
fn set_direction_works_while_detached() {
    let mut fill = SprayFill::new(SprayConfig::default(), VirtualScheduler::default()).unwrap();
    fill.set_sweep_direction(SweepDirection::RightToLeft);
    assert_eq!(fill.direction(), SweepDirection::RightToLeft);

    fill.attach(1.0).unwrap();
    assert_eq!(fill.nozzle().x, 900.0);
}

#[test]
fn paint_is_clipped_to_mask() {
    let mut cfg = config(r#"{"width": 120, "height": 60, "flow_rate": 60000, "nozzle_radius": 40}"#);
    cfg.mask = MaskSpec::path(|w, h| kurbo::Rect::new(0.0, 0.0, w * 0.5, h).to_path(0.1));
    let mut fill = SprayFill::new(cfg, VirtualScheduler::default()).unwrap();
    fill.attach(1.0).unwrap();
    fill.start();
    run_virtual(&mut fill, 1000);

    let snap = fill.snapshot().unwrap();
    let mut left_painted = 0;
    for y in 0..snap.height {
        for x in 0..snap.width {
            let a = snap.pixel(x, y).unwrap()[3];
            if x >= 61 {
                assert_eq!(a, 0, "paint leaked at ({x},{y})");
            } else if a > 0 {
                left_painted += 1;
            }
        }
    }
    assert!(left_painted > 100);
}

#[test]
fn mask_is_built_once_per_surface() {
    let mut fill = attached(r#"{"width": 100, "height": 40}"#);
    assert_eq!(fill.mask_builds(), 1);
    fill.start();
    run_virtual(&mut fill, 30);
    assert_eq!(fill.mask_builds(), 1);

    fill.attach(1.0).unwrap();
    assert_eq!(fill.mask_builds(), 1);
    fill.attach(2.0).unwrap();
    assert_eq!(fill.mask_builds(), 2);
    assert_eq!(fill.snapshot().unwrap().width, 200);
}

#[test]
fn detach_stops_and_drops_surface() {
    let mut fill = attached(r#"{"width": 100, "height": 40}"#);
    fill.start();
    fill.step_virtual().unwrap();
    fill.detach();
    assert!(!fill.is_attached());
    assert!(!fill.is_running());
    assert_eq!(fill.scheduler().pending(), None);
    fill.start();
    assert!(!fill.is_running());
}
