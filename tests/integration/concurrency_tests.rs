//! Multi-threaded tests: real threads racing on one coordinator, and the
//! real `ThreadTimer` driving auto-off.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use basalt_light::app::events::MotionEdge::{Falling, Rising};
use basalt_light::app::service::LightCoordinator;
use basalt_light::config::LightConfig;
use basalt_light::fsm::LightState;
use basalt_light::timer::ThreadTimer;

use crate::mock_hw::{NoDelay, RecordingDisplay, RecordingPublisher, Rig};

fn threaded(auto_off_secs: u32) -> (
    Arc<LightCoordinator<RecordingDisplay, RecordingPublisher, ThreadTimer, NoDelay>>,
    RecordingDisplay,
    RecordingPublisher,
) {
    let config = LightConfig {
        auto_off_secs,
        ..LightConfig::default()
    };
    let display = RecordingDisplay::new(config.pixel_count);
    let publisher = RecordingPublisher::new();
    let light = LightCoordinator::new(
        &config,
        display.clone(),
        publisher.clone(),
        ThreadTimer::new(),
        NoDelay,
    )
    .unwrap();
    light.start();
    (light, display, publisher)
}

fn wait_for(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let t0 = Instant::now();
    while t0.elapsed() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    done()
}

#[test]
fn motion_and_command_serialize() {
    for _ in 0..20 {
        let rig = Rig::started();
        let published = rig.publisher.len();
        let shows = rig.display.show_calls();
        let barrier = Arc::new(Barrier::new(2));

        let (l1, b1) = (Arc::clone(&rig.light), Arc::clone(&barrier));
        let motion = thread::spawn(move || {
            b1.wait();
            l1.on_motion_edge(Rising);
        });
        let (l2, b2) = (Arc::clone(&rig.light), Arc::clone(&barrier));
        let command = thread::spawn(move || {
            b2.wait();
            l2.set_state("FullBright").unwrap();
        });
        motion.join().unwrap();
        command.join().unwrap();

        let state = rig.light.current_state();
        assert!(matches!(state, LightState::NightLight | LightState::FullBright));
        assert_eq!(rig.display.show_calls(), shows + 2);
        assert_eq!(rig.publisher.len(), published + 2);
        assert_eq!(rig.publisher.last_payload().as_deref(), Some(state.name()));
    }
}

#[test]
fn hammering_keeps_one_pending_timer() {
    let rig = Rig::started();
    let workers: Vec<_> = (0..8)
        .map(|w| {
            let light = Arc::clone(&rig.light);
            thread::spawn(move || {
                for i in 0..200 {
                    match (w + i) % 4 {
                        0 => light.on_motion_edge(Rising),
                        1 | 2 => light.on_motion_edge(Falling),
                        _ => light.set_state("Test1").unwrap(),
                    }
                }
            })
        })
        .collect();
    let clock = rig.timer.clone();
    let ticker = thread::spawn(move || {
        for _ in 0..200 {
            clock.advance(Duration::from_millis(50));
        }
    });
    for w in workers {
        w.join().unwrap();
    }
    ticker.join().unwrap();

    assert!(rig.timer.pending_count() <= 1);
    let last = rig.publisher.last_payload().unwrap();
    assert_eq!(last, rig.light.current_state().name());
}

#[test]
fn thread_timer_turns_the_light_off() {
    let (light, _display, publisher) = threaded(1);
    light.on_motion_edge(Rising);
    light.on_motion_edge(Falling);
    assert_eq!(light.current_state(), LightState::NightLight);

    assert!(wait_for(Duration::from_secs(5), || light.current_state() == LightState::Off));
    thread::sleep(Duration::from_millis(200));
    assert_eq!(publisher.payloads(), ["Startup", "Off", "NightLight", "Off"]);
    assert_eq!(light.pending_timer(), None);
}

#[test]
fn rearm_on_thread_timer_fires_once() {
    let (light, _display, publisher) = threaded(1);
    light.on_motion_edge(Rising);
    for _ in 0..5 {
        light.on_motion_edge(Falling);
        thread::sleep(Duration::from_millis(100));
    }

    assert!(wait_for(Duration::from_secs(5), || light.current_state() == LightState::Off));
    thread::sleep(Duration::from_millis(1500));
    assert_eq!(publisher.count("Off"), 2);
}

#[test]
fn shutdown_beats_a_pending_thread_timer() {
    let (light, _display, publisher) = threaded(1);
    light.on_motion_edge(Rising);
    light.on_motion_edge(Falling);

    light.shutdown();
    let published = publisher.len();
    thread::sleep(Duration::from_millis(1500));

    assert_eq!(light.current_state(), LightState::Off);
    assert_eq!(publisher.len(), published);
}

#[test]
fn snapshot_reads_never_block() {
    let rig = Rig::started();
    let reader = {
        let light = Arc::clone(&rig.light);
        thread::spawn(move || {
            for _ in 0..10_000 {
                let s = light.current_state();
                assert!(s.is_display() || s == LightState::Error);
            }
        })
    };
    for _ in 0..100 {
        rig.light.on_motion_edge(Rising);
        rig.light.fault("flap");
        rig.light.set_state("Off").unwrap();
    }
    reader.join().unwrap();
}
