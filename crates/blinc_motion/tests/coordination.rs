//! End-to-end coordination tests over the scriptable host doubles

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use blinc_motion::{
    api, clear_global_registry, set_global_registry, MotionConfig, MotionRegistry,
    PerformanceTier, SignalKind, SignalValue, ViewportTracker,
};
use blinc_platform::testing::{ManualClock, RecordingSignalSource, ScriptedEnvironment};
use blinc_platform::DeviceHints;

struct Host {
    registry: MotionRegistry,
    source: Rc<RecordingSignalSource>,
    env: Rc<ScriptedEnvironment>,
}

fn host(hints: DeviceHints) -> Host {
    let source = Rc::new(RecordingSignalSource::new());
    let env = Rc::new(ScriptedEnvironment::new().with_hints(hints));
    let registry = MotionRegistry::builder()
        .signal_source(source.clone())
        .environment(env.clone())
        .clock(Rc::new(ManualClock::new(0.0)))
        .build();
    Host {
        registry,
        source,
        env,
    }
}

fn desktop() -> DeviceHints {
    DeviceHints::unknown()
        .cores(12)
        .coarse_pointer(false)
        .memory_gb(16.0)
}

fn scroll(y: f32, ts: f64) -> SignalValue {
    SignalValue::scroll(0.0, y, 0.0, 1000.0, ts)
}

#[test]
fn test_idempotent_registration() {
    let host = host(desktop());
    host.registry.track("x", "cat");
    host.registry.track("x", "cat");
    assert_eq!(host.registry.active_count(), 1);
}

#[test]
fn test_balanced_lifecycle_never_goes_negative() {
    let host = host(desktop());
    host.registry.untrack("ghost");
    assert_eq!(host.registry.active_count(), 0);

    host.registry.track("a", "hero");
    host.registry.track("b", "hero");
    host.registry.untrack("a");
    host.registry.untrack("a");
    host.registry.untrack("ghost");
    assert_eq!(host.registry.active_count(), 1);
}

#[test]
fn test_one_native_listener_per_kind() {
    let host = host(desktop());
    let ids = ["a", "b", "c", "d", "e"];
    for id in ids {
        host.registry.subscribe(SignalKind::Scroll, id, |_| {});
    }
    assert_eq!(host.source.attach_count(SignalKind::Scroll), 1);
    assert_eq!(host.source.attach_count(SignalKind::Resize), 0);

    for id in ids {
        host.registry.unsubscribe(SignalKind::Scroll, id);
    }
    assert_eq!(host.source.detach_count(SignalKind::Scroll), 1);
    assert!(!host.source.is_attached(SignalKind::Scroll));

    // A new first subscriber re-attaches
    host.registry.subscribe(SignalKind::Scroll, "f", |_| {});
    assert_eq!(host.source.attach_count(SignalKind::Scroll), 2);
}

#[test]
fn test_fan_out_in_registration_order() {
    let host = host(desktop());
    let log = Rc::new(RefCell::new(Vec::new()));
    for id in ["a", "b", "c"] {
        let log = Rc::clone(&log);
        host.registry
            .subscribe(SignalKind::Resize, id, move |_| log.borrow_mut().push(id));
    }

    host.source.emit(SignalValue::resize(1280.0, 720.0, 4.0));
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn test_panicking_subscriber_is_isolated() {
    let host = host(desktop());
    let received = Rc::new(RefCell::new(Vec::new()));

    let r = Rc::clone(&received);
    host.registry
        .subscribe(SignalKind::PointerMove, "a", move |v| r.borrow_mut().push(("a", v.timestamp_ms)));
    host.registry
        .subscribe(SignalKind::PointerMove, "b", |_| panic!("subscriber b failed"));
    let r = Rc::clone(&received);
    host.registry
        .subscribe(SignalKind::PointerMove, "c", move |v| r.borrow_mut().push(("c", v.timestamp_ms)));

    let delivered = host.registry.dispatch(&SignalValue::pointer(1.0, 2.0, 7.0));
    assert_eq!(delivered, 2);
    assert_eq!(*received.borrow(), vec![("a", 7.0), ("c", 7.0)]);
}

#[test]
fn test_failing_subscriber_is_isolated() {
    let host = host(desktop());
    let received = Rc::new(RefCell::new(Vec::new()));

    let r = Rc::clone(&received);
    host.registry
        .subscribe(SignalKind::Scroll, "a", move |v| r.borrow_mut().push(("a", v.timestamp_ms)));
    host.registry
        .try_subscribe(SignalKind::Scroll, "b", |_| Err(String::from("subscriber b failed")));
    let r = Rc::clone(&received);
    host.registry
        .subscribe(SignalKind::Scroll, "c", move |v| r.borrow_mut().push(("c", v.timestamp_ms)));

    assert!(host.source.emit(scroll(10.0, 3.0)));
    assert_eq!(*received.borrow(), vec![("a", 3.0), ("c", 3.0)]);
}

#[test]
fn test_replaced_global_registry_reuses_source() {
    let source = Rc::new(RecordingSignalSource::new());
    let env = Rc::new(ScriptedEnvironment::new().with_hints(desktop()));

    set_global_registry(MotionRegistry::new(source.clone(), env.clone()));
    api::subscribe_to_signal(SignalKind::Scroll, "a", |_| {});
    assert!(source.is_attached(SignalKind::Scroll));

    drop(clear_global_registry());
    assert!(!source.is_attached(SignalKind::Scroll));

    let hits = Rc::new(Cell::new(0));
    set_global_registry(MotionRegistry::new(source.clone(), env));
    let h = Rc::clone(&hits);
    api::subscribe_to_signal(SignalKind::Scroll, "b", move |_| h.set(h.get() + 1));
    assert!(source.emit(scroll(5.0, 1.0)));
    assert_eq!(hits.get(), 1);
    assert_eq!(source.attach_count(SignalKind::Scroll), 2);

    clear_global_registry();
}

#[test]
fn test_reduced_motion_override_beats_tier_and_load() {
    let host = host(desktop());
    host.registry.set_reduced_motion_override(Some(true));

    for count in 0..12 {
        assert!(!host.registry.should_animate(), "animating at {count} tracked");
        host.registry.track(format!("anim-{count}"), "load");
    }
    assert!(!host.registry.preferences().should_animate);
}

#[test]
fn test_system_reduced_motion_change_is_live() {
    let host = host(desktop());
    assert!(host.registry.should_animate());

    host.env.set_reduced_motion(true);
    assert!(host.registry.reduced_motion());
    assert!(!host.registry.should_animate());

    host.env.set_reduced_motion(false);
    assert!(host.registry.should_animate());
}

#[test]
fn test_intensity_follows_tier() {
    let low = host(DeviceHints::unknown().cores(2));
    assert_eq!(low.registry.performance_tier(), PerformanceTier::Low);
    assert_eq!(low.registry.intensity(1.0), 0.5);

    let high = host(desktop());
    assert_eq!(high.registry.performance_tier(), PerformanceTier::High);
    assert_eq!(high.registry.intensity(1.0), 1.0);

    let mut previous = 0.0;
    for step in 0..=20 {
        let value = low.registry.intensity(step as f32 * 0.5);
        assert!(value >= previous);
        previous = value;
    }
}

#[test]
fn test_load_degrades_and_recovers() {
    let host = host(desktop());
    for i in 0..9 {
        host.registry.track(format!("anim-{i}"), "section");
    }
    assert_eq!(host.registry.performance_tier(), PerformanceTier::Medium);
    assert_eq!(host.registry.intensity(1.0), 0.75);

    for i in 0..8 {
        host.registry.untrack(&format!("anim-{i}"));
    }
    assert_eq!(host.registry.performance_tier(), PerformanceTier::High);
}

#[test]
fn test_self_unsubscribe_detaches_listener() {
    let host = host(desktop());
    let calls = Rc::new(Cell::new(0));
    let handle = host.registry.handle();
    let c = Rc::clone(&calls);
    host.registry.subscribe(SignalKind::Scroll, "once", move |_| {
        c.set(c.get() + 1);
        handle.unsubscribe(SignalKind::Scroll, "once");
    });

    host.source.emit(scroll(10.0, 1.0));
    assert!(!host.source.emit(scroll(20.0, 2.0)));
    assert_eq!(calls.get(), 1);
    assert_eq!(host.source.detach_count(SignalKind::Scroll), 1);
}

#[test]
fn test_attach_failure_leaves_no_subscriber() {
    let host = host(desktop());
    host.source.set_failing(true);
    host.registry.subscribe(SignalKind::Resize, "layout", |_| {});

    let diagnostics = host.registry.diagnostics();
    assert_eq!(diagnostics.subscribers.resize, 0);
    assert_eq!(diagnostics.attached_listeners, 0);

    host.source.set_failing(false);
    host.registry.subscribe(SignalKind::Resize, "layout", |_| {});
    assert_eq!(host.registry.diagnostics().subscribers.resize, 1);
}

#[test]
fn test_unavailable_environment_fails_open() {
    let host = host(desktop());
    host.env.set_available(false);
    host.env.set_visible(false);

    let prefs = host.registry.preferences();
    assert!(prefs.should_animate);
    assert_eq!(prefs.performance_tier, PerformanceTier::Medium);
}

#[test]
fn test_hidden_page_pauses_animation() {
    let host = host(desktop());
    host.env.set_visible(false);
    assert!(!host.registry.should_animate());
    host.env.set_visible(true);
    assert!(host.registry.should_animate());
}

#[test]
fn test_guards_clean_up_on_drop() {
    let host = host(desktop());
    {
        let _viewport = ViewportTracker::new(&host.registry, "parallax");
        let _hero = host.registry.start_activity("hero", "about-section");
        assert_eq!(host.registry.active_count(), 1);
        assert_eq!(host.source.attached_listeners(), 3);
    }
    assert_eq!(host.registry.active_count(), 0);
    assert_eq!(host.source.attached_listeners(), 0);
}

#[test]
fn test_config_from_toml_drives_registry() {
    let config = MotionConfig::from_toml_str(
        r#"
        degrade_threshold = 2

        [multipliers]
        low = 0.25
        "#,
    )
    .unwrap();

    let registry = MotionRegistry::builder()
        .environment(Rc::new(
            ScriptedEnvironment::new().with_hints(DeviceHints::unknown().cores(4)),
        ))
        .config(config)
        .build();

    for id in ["a", "b", "c"] {
        registry.track(id, "x");
    }
    assert_eq!(registry.performance_tier(), PerformanceTier::Low);
    assert_eq!(registry.intensity(2.0), 0.5);
}

#[test]
fn test_global_api_round_trip() {
    let host = host(desktop());
    set_global_registry(host.registry.clone());

    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    api::subscribe_to_signal(SignalKind::Scroll, "global", move |_| h.set(h.get() + 1));
    api::track_animation("orb", "mouse-tracking");

    host.source.emit(scroll(5.0, 1.0));
    assert_eq!(hits.get(), 1);
    assert_eq!(api::animation_preferences().performance_tier, PerformanceTier::High);

    api::unsubscribe_from_signal(SignalKind::Scroll, "global");
    api::untrack_animation("orb");
    assert_eq!(host.registry.active_count(), 0);
    assert!(!host.source.is_attached(SignalKind::Scroll));

    clear_global_registry();
    assert!(api::animation_preferences().should_animate);
}
