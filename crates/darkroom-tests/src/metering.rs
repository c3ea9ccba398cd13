//! Integration tests for the live metering path.
//!
//! Exercises frame source → sampler → spot meter → resolver across
//! darkroom-meter, darkroom-exposure and darkroom-core.

use darkroom_core::{format_shutter, Rgb8, SHUTTERS};
use darkroom_exposure::PriorityMode;
use darkroom_meter::{
    spawn_meter, MeterConfig, MeterReading, MeterSession, MeterState, Scene, SyntheticSource,
    TickOutcome,
};
use proptest::prelude::*;
use std::time::Duration;

// ── Helpers ────────────────────────────────────────────────────

fn session() -> MeterSession {
    MeterSession::new(MeterConfig::default()).unwrap()
}

fn spot_scene(background: u8, spot: u8) -> Scene {
    Scene::Spot {
        background: Rgb8::grey(background),
        spot: Rgb8::grey(spot),
        radius: 0.25,
    }
}

fn tick(session: &mut MeterSession, source: &mut SyntheticSource) -> MeterReading {
    match session.tick(source).unwrap() {
        TickOutcome::Reading(r) => r,
        TickOutcome::Pending => panic!("synthetic source should always be ready"),
    }
}

// ── Spot metering ──────────────────────────────────────────────

#[test]
fn spot_ignores_dark_surround() {
    let mut s = session();
    let mut src = SyntheticSource::new(640, 480, spot_scene(0, 188));
    let mut last = None;
    for _ in 0..150 {
        last = Some(tick(&mut s, &mut src));
    }
    let r = last.unwrap();
    // Luma 188 is two stops over mid-grey.
    assert!((r.ev.smoothed - 14.0).abs() < 0.01);
}

#[test]
fn brighter_scene_gives_faster_shutter() {
    let mut dim = session();
    let mut bright = session();
    let mut dim_src = SyntheticSource::new(320, 240, Scene::Uniform(Rgb8::grey(70)));
    let mut bright_src = SyntheticSource::new(320, 240, Scene::Uniform(Rgb8::grey(220)));
    let (mut d, mut b) = (None, None);
    for _ in 0..100 {
        d = Some(tick(&mut dim, &mut dim_src));
        b = Some(tick(&mut bright, &mut bright_src));
    }
    let (d, b) = (d.unwrap(), b.unwrap());
    assert!(b.pair.shutter < d.pair.shutter);
    assert!(SHUTTERS.contains(b.pair.shutter));
    assert!(SHUTTERS.contains(d.pair.shutter));
}

#[test]
fn shutter_priority_derives_aperture() {
    let mut s = session();
    s.controls()
        .update_settings(|st| {
            st.set_priority(PriorityMode::ShutterFixed);
            st.set_iso(100.0)?;
            st.set_shutter(1.0 / 125.0)
        })
        .unwrap();
    let mut src = SyntheticSource::new(320, 240, Scene::Uniform(Rgb8::grey(128)));
    let r = tick(&mut s, &mut src);
    // EV 12 at ISO 100, 1/125: sqrt(0.008 × 4096) ≈ 5.7
    assert_eq!(r.pair.aperture, 5.6);
    assert_eq!(format_shutter(r.pair.shutter), "1/125");
}

#[test]
fn zone_overlay_marks_spot_and_surround() {
    let mut s = session();
    s.controls().set_zone_overlay(true);
    let mut src = SyntheticSource::new(400, 400, spot_scene(10, 250));
    let r = tick(&mut s, &mut src);
    let overlay = r.overlay.unwrap();
    assert_eq!((overlay.width(), overlay.height()), (400, 400));
    assert_eq!(overlay.get(0, 0), Some(Rgb8::BLUE));
    assert_eq!(overlay.get(200, 200), Some(Rgb8::RED));

    // Locking keeps the overlay from the last metered frame.
    s.controls().set_locked(true);
    src.set_scene(Scene::Uniform(Rgb8::grey(128)));
    let locked = tick(&mut s, &mut src);
    assert_eq!(locked.state, MeterState::Locked);
    assert_eq!(locked.overlay.as_ref(), Some(&overlay));
}

// ── Lock invariant ─────────────────────────────────────────────

proptest! {
    #[test]
    fn locked_ticks_never_move_smoothed_ev(
        before in proptest::collection::vec(0u8..=255, 1..10),
        during in proptest::collection::vec(0u8..=255, 1..20),
    ) {
        let mut s = session();
        let mut src = SyntheticSource::new(64, 48, Scene::Uniform(Rgb8::grey(128)));
        for l in before {
            src.set_scene(Scene::Uniform(Rgb8::grey(l)));
            tick(&mut s, &mut src);
        }
        let frozen = s.estimate().smoothed;
        s.controls().set_locked(true);
        for l in during {
            src.set_scene(Scene::Uniform(Rgb8::grey(l)));
            let r = tick(&mut s, &mut src);
            prop_assert_eq!(r.state, MeterState::Locked);
            prop_assert_eq!(r.ev.smoothed, frozen);
        }
    }
}

// ── Live loop ──────────────────────────────────────────────────

#[tokio::test]
async fn live_meter_survives_pending_frames() {
    let session = MeterSession::new(MeterConfig {
        tick_hz: 500.0,
        ..Default::default()
    })
    .unwrap();
    let source = SyntheticSource::new(320, 240, Scene::Uniform(Rgb8::grey(128)))
        .with_pending_every(3);
    let handle = spawn_meter(session, source);

    let mut rx = handle.readings();
    tokio::time::timeout(Duration::from_secs(5), async {
        let mut seen = 0;
        while seen < 10 {
            rx.changed().await.unwrap();
            seen += 1;
        }
    })
    .await
    .unwrap();

    let summary = handle.stop().await.unwrap();
    assert!(summary.pending >= 1);
    assert!(summary.readings >= 10);
}
