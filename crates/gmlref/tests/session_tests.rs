//! Registry, binder and session tests

use std::sync::Arc;

use gmlref::*;

fn point(x: f64, y: f64) -> GeometryHandle {
    Arc::new(Point::new(vec![x, y], Crs::new("EPSG:4326")).unwrap())
}

// ═══════════════════════════════════════════════════════════════════════
// Deduplication
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_two_lookups_share_one_target() {
    let mut registry = ReferenceRegistry::default();
    let first = registry.lookup_or_create("#A").unwrap();
    let second = registry.lookup_or_create("#A").unwrap();

    let target = point(3.0, 4.0);
    registry.binder().bind("A", Arc::clone(&target)).unwrap();

    assert!(Arc::ptr_eq(first.target().unwrap(), &target));
    assert!(Arc::ptr_eq(second.target().unwrap(), &target));
    assert_eq!(first.envelope(), second.envelope());
}

#[test]
fn test_lookups_for_different_ids_are_independent() {
    let mut registry = ReferenceRegistry::default();
    let a = registry.lookup_or_create("#A").unwrap();
    let b = registry.lookup_or_create("#B").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));

    registry.binder().bind("A", point(0.0, 0.0)).unwrap();
    assert!(a.is_resolved());
    assert!(!b.is_resolved());
    assert_eq!(registry.pending_count(), 1);
}

#[test]
fn test_registered_instances_resolve_together() {
    let mut registry = ReferenceRegistry::default();
    let instances: Vec<_> = (0..3)
        .map(|_| Arc::new(GeometryReference::new("#A").unwrap()))
        .collect();
    for r in &instances {
        registry.register(Arc::clone(r)).unwrap();
    }
    assert_eq!(registry.occurrences("A"), 3);

    let target = point(1.0, 1.0);
    assert_eq!(registry.binder().bind("A", Arc::clone(&target)).unwrap(), 3);
    for r in &instances {
        assert!(Arc::ptr_eq(r.target().unwrap(), &target));
    }
}

#[test]
fn test_registering_late_instance_resolves_it() {
    let mut registry = ReferenceRegistry::default();
    let target = point(1.0, 1.0);
    registry.binder().bind("A", Arc::clone(&target)).unwrap();

    let late = Arc::new(GeometryReference::new("#A").unwrap());
    registry.register(Arc::clone(&late)).unwrap();
    assert!(Arc::ptr_eq(late.target().unwrap(), &target));
}

#[test]
fn test_registering_conflicting_instance_fails() {
    let mut registry = ReferenceRegistry::new(&SessionConfig::new().with_max_references(2));
    registry.binder().bind("A", point(1.0, 1.0)).unwrap();

    let stale = Arc::new(GeometryReference::new("#A").unwrap());
    stale.resolve(point(9.0, 9.0)).unwrap();
    assert_eq!(
        registry.register(stale),
        Err(RefError::AlreadyResolved {
            id: "A".to_string()
        })
    );

    // the rejected instance is not counted anywhere
    assert_eq!(registry.occurrences("A"), 0);
    assert_eq!(registry.pending_count(), 0);
    registry.lookup_or_create("#B").unwrap();
    registry.lookup_or_create("#C").unwrap();
    assert_eq!(
        registry.lookup_or_create("#D").unwrap_err(),
        RefError::TooManyReferences { max: 2 }
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Binder
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_bind_twice_is_rejected_and_keeps_first() {
    let mut registry = ReferenceRegistry::default();
    let r = registry.lookup_or_create("#A").unwrap();
    let first = point(1.0, 1.0);
    registry.binder().bind("A", Arc::clone(&first)).unwrap();

    assert_eq!(
        registry.binder().bind("A", point(2.0, 2.0)),
        Err(RefError::AlreadyResolved {
            id: "A".to_string()
        })
    );
    assert!(Arc::ptr_eq(r.target().unwrap(), &first));
    assert!(Arc::ptr_eq(registry.bound_target("A").unwrap(), &first));
}

#[test]
fn test_bind_unknown_id_is_noop() {
    let mut registry = ReferenceRegistry::default();
    assert_eq!(registry.binder().bind("ghost", point(0.0, 0.0)), Ok(0));
    assert_eq!(registry.occurrences("ghost"), 0);
    assert!(registry.finalize().is_empty());
}

#[test]
fn test_reference_can_target_another_reference() {
    let mut registry = ReferenceRegistry::default();
    let outer = registry.lookup_or_create("#outer").unwrap();
    let inner = registry.lookup_or_create("#inner").unwrap();

    registry.binder().bind("outer", inner.clone()).unwrap();
    assert_eq!(
        outer.crs(),
        Err(RefError::UnresolvedReference {
            id: "inner".to_string()
        })
    );

    registry.binder().bind("inner", point(5.0, 5.0)).unwrap();
    assert_eq!(outer.envelope().unwrap().min(), &[5.0, 5.0]);
}

#[test]
fn test_two_reference_cycle_is_rejected() {
    let mut session = ParseSession::default();
    let a = session.reference("#a").unwrap();
    let b = session.reference("#b").unwrap();

    session.bind("a", b.clone()).unwrap();
    assert_eq!(
        session.bind("b", a.clone()),
        Err(RefError::SelfReference {
            id: "b".to_string()
        })
    );

    // the cycle was never closed, so calls terminate
    assert_eq!(
        a.crs(),
        Err(RefError::UnresolvedReference {
            id: "b".to_string()
        })
    );
    assert_eq!(session.finish().dangling_ids(), vec!["b"]);
}

// ═══════════════════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_sessions_do_not_share_identifiers() {
    let mut first = ParseSession::default();
    let mut second = ParseSession::default();

    let a1 = first.reference("#A").unwrap();
    let a2 = second.reference("#A").unwrap();
    assert!(!Arc::ptr_eq(&a1, &a2));

    first.bind("A", point(0.0, 0.0)).unwrap();
    assert!(a1.is_resolved());
    assert!(!a2.is_resolved());

    assert!(first.finish().is_clean());
    assert_eq!(second.finish().dangling_ids(), vec!["A"]);
}

#[test]
fn test_dangling_reported_once_per_identifier() {
    let mut session = ParseSession::new(
        SessionConfig::new().with_dangling_severity(Severity::Error),
    );
    for href in ["#B", "#A", "#B", "#C", "#B"] {
        session.reference(href).unwrap();
    }
    session.bind("A", point(0.0, 0.0)).unwrap();

    let outcome = session.finish();
    assert_eq!(
        outcome.dangling,
        vec![
            DanglingReference {
                id: "B".to_string(),
                occurrences: 3
            },
            DanglingReference {
                id: "C".to_string(),
                occurrences: 1
            },
        ]
    );
    assert_eq!(outcome.resolved, 1);
    assert_eq!(
        outcome.into_result(),
        Err(RefError::DanglingReferences {
            ids: vec!["B".to_string(), "C".to_string()]
        })
    );
}

#[test]
fn test_session_reference_limit() {
    let mut session = ParseSession::new(SessionConfig::new().with_max_references(1));
    session.reference("#A").unwrap();
    assert_eq!(
        session.reference("#A").unwrap_err(),
        RefError::TooManyReferences { max: 1 }
    );
}
