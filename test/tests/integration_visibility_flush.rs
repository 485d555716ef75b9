//! Delayed, visibility-driven delivery: suppressed commands surface exactly
//! once when the object enters the observer's scope, and never twice.

use mirror_server::ReplicationSource;
use mirror_shared::ScopedVisibility;
use mirror_test::{recording_observer, CascadeSet, ObjectId, SetProperty, SpawnObject, ToyWorld};

type Source = ReplicationSource<ToyWorld, &'static str, ScopedVisibility<ObjectId, &'static str>>;

fn new_source() -> Source {
    let _ = env_logger::builder().is_test(true).try_init();
    ReplicationSource::new(ToyWorld::new(), ScopedVisibility::new())
}

#[test]
fn invisible_commit_defers_until_the_scope_opens() {
    let mut source = new_source();
    let o = ObjectId::new(1);
    let (observer, handle) = recording_observer();
    source.register("K2", handle).unwrap();

    // Private command touching an object out of K2's scope: suppressed.
    source
        .execute(SpawnObject::new(o).with_property("P", 9).handle())
        .unwrap();
    assert_eq!(observer.borrow().delivery_count(), 0);
    assert!(source.has_pending_update(&o));

    // Scope opens: exactly one delivery carrying the object's update.
    source.scope_mut().set_visible(o, "K2", true);
    {
        let observer = observer.borrow();
        assert_eq!(observer.delivery_count(), 1);
        assert!(observer.world.contains(&o));
        assert_eq!(observer.world.property(&o, "P"), Some(9));
    }
    assert!(!source.has_pending_update(&o));

    // A redundant true transition raises no event and delivers nothing.
    source.scope_mut().set_visible(o, "K2", true);
    assert_eq!(observer.borrow().delivery_count(), 1);

    // Leaving and re-entering scope with no new suppressed command delivers
    // nothing either: the pending entry was consumed.
    source.scope_mut().set_visible(o, "K2", false);
    source.scope_mut().set_visible(o, "K2", true);
    assert_eq!(observer.borrow().delivery_count(), 1);
}

#[test]
fn scope_closing_before_the_flush_cancels_it() {
    let mut source = new_source();
    let o = ObjectId::new(1);
    let (observer, handle) = recording_observer();
    source.register("K2", handle).unwrap();

    source.execute(SpawnObject::new(o).handle()).unwrap();
    assert!(source.has_pending_update(&o));

    // Both transitions land in the same guard: schedule, then cancel, before
    // any realization point.
    {
        let mut scope = source.scope_mut();
        scope.set_visible(o, "K2", true);
        scope.set_visible(o, "K2", false);
    }
    assert_eq!(observer.borrow().delivery_count(), 0);
    // The pending entry itself survives for a later flush.
    assert!(source.has_pending_update(&o));
}

#[test]
fn later_suppressed_updates_overwrite_earlier_ones() {
    let mut source = new_source();
    let o = ObjectId::new(1);
    let (observer, handle) = recording_observer();
    source.register("K2", handle).unwrap();

    // The spawn itself is public so the observer's shadow holds the object;
    // the property updates are private and suppressed.
    source
        .execute(SpawnObject::new(o).public().handle())
        .unwrap();
    source.execute(SetProperty::new(o, "P", 5).handle()).unwrap();
    source.execute(SetProperty::new(o, "P", 7).handle()).unwrap();
    assert_eq!(observer.borrow().delivery_count(), 1);

    // One flush, carrying the latest update only.
    source.scope_mut().set_visible(o, "K2", true);
    let observer = observer.borrow();
    assert_eq!(observer.delivery_count(), 2);
    assert_eq!(observer.world.property(&o, "P"), Some(7));
}

#[test]
fn flush_after_deregistration_consumes_the_entry_silently() {
    let mut source = new_source();
    let o = ObjectId::new(1);
    let (observer, handle) = recording_observer();
    source.register("K2", handle).unwrap();

    source.execute(SpawnObject::new(o).handle()).unwrap();
    assert!(source.has_pending_update(&o));

    source.deregister(&"K2").unwrap();
    source.scope_mut().set_visible(o, "K2", true);

    assert_eq!(observer.borrow().delivery_count(), 0);
    // The destructive read happened anyway.
    assert!(!source.has_pending_update(&o));
}

#[test]
fn cascade_sub_commands_stream_while_the_parent_defers() {
    let mut source = new_source();
    let o = ObjectId::new(1);
    let (observer, handle) = recording_observer();
    source.register("K2", handle).unwrap();

    source
        .execute(SpawnObject::new(o).public().handle())
        .unwrap();

    // The detached cascade sub-command is globally visible and goes out in
    // the immediate pass; the private parent is bound to the out-of-scope
    // object and defers.
    source
        .execute(
            CascadeSet::new(SetProperty::new(o, "P", 5))
                .with_cascade(SetProperty::detached(o, "Q", 6))
                .handle(),
        )
        .unwrap();

    {
        let observer = observer.borrow();
        assert_eq!(observer.delivery_count(), 2);
        assert_eq!(observer.world.property(&o, "Q"), Some(6));
        assert_eq!(observer.world.property(&o, "P"), None);
    }

    source.scope_mut().set_visible(o, "K2", true);
    let observer = observer.borrow();
    assert_eq!(observer.delivery_count(), 3);
    assert_eq!(observer.world.property(&o, "P"), Some(5));
}
