//! Record-store contract tests, run against every backend.
//!
//! Each check is written once as a generic function over [`RecordStore`];
//! the `conformance!` macro instantiates the whole suite per backend so
//! InMemoryStore and SqliteStore are held to identical error semantics.

mod common;

use cellstore_core::{
    EntityKind, ForeignKey, Identity, ProperClass, TypedConnector, Urr, Uuid, MAX_NAME_LENGTH,
};
use cellstore_storage::{RecordStore, StoreError};
use proptest::prelude::*;

use common::{agent, connector, ident, node};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Identities `a`..`e` plus nodes `n1`, `n2` and connector `c1` between them.
fn seed<S: RecordStore>(store: &mut S) {
    for uuid in ["a", "b", "c", "d", "e"] {
        store.insert_identity(&ident(uuid, uuid)).unwrap();
    }
    store.insert_node(&node("n1", "a", "b", ProperClass::Node)).unwrap();
    store.insert_node(&node("n2", "a", "b", ProperClass::Node)).unwrap();
    store
        .insert_connector(&connector("c1", "c", ProperClass::Connector, "n1", "n2"))
        .unwrap();
}

fn assert_violates(result: Result<(), StoreError>, expected: ForeignKey) {
    match result {
        Err(StoreError::ReferentialIntegrity { constraint, .. }) => assert_eq!(constraint, expected),
        other => panic!("expected {expected} violation, got: {:?}", other),
    }
}

fn assert_duplicate(result: Result<(), StoreError>, expected: EntityKind) {
    match result {
        Err(StoreError::DuplicateKey { entity, .. }) => assert_eq!(entity, expected),
        other => panic!("expected duplicate {expected}, got: {:?}", other),
    }
}

fn assert_not_found(result: Result<(), StoreError>, expected: EntityKind) {
    match result {
        Err(StoreError::NotFound { entity, .. }) => assert_eq!(entity, expected),
        other => panic!("expected missing {expected}, got: {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn inserted_records_read_back_equal<S: RecordStore>(mut store: S) {
    seed(&mut store);
    let typed = TypedConnector::uniform("c1", &Uuid::new("d"));
    store.insert_typed_connector(&typed).unwrap();
    let owner = agent("a", "e");
    store.insert_agent(&owner).unwrap();

    assert_eq!(store.get_identity("a").unwrap(), ident("a", "a"));
    assert_eq!(store.get_node("n1").unwrap(), node("n1", "a", "b", ProperClass::Node));
    assert_eq!(
        store.get_connector("c1").unwrap(),
        connector("c1", "c", ProperClass::Connector, "n1", "n2")
    );
    assert_eq!(store.get_typed_connector("c1").unwrap(), typed);
    assert_eq!(store.get_agent("a").unwrap(), owner);
}

fn identity_with_long_name_is_never_written<S: RecordStore>(mut store: S) {
    let long = ident("long", &"x".repeat(MAX_NAME_LENGTH + 1));
    match store.insert_identity(&long) {
        Err(StoreError::Validation { field, reason }) => {
            assert_eq!(field, "name");
            assert_eq!(reason, "Identity name is invalid (exceeds length limit of 100)");
        }
        other => panic!("expected Validation, got: {:?}", other),
    }
    assert_eq!(store.count(EntityKind::Identity).unwrap(), 0);
    assert!(matches!(store.get_identity("long"), Err(StoreError::NotFound { .. })));
}

fn update_with_long_name_leaves_stored_row<S: RecordStore>(mut store: S) {
    store.insert_identity(&ident("a", "Alpha")).unwrap();
    let long = ident("a", &"x".repeat(MAX_NAME_LENGTH + 1));
    match store.update_identity(&long) {
        Err(StoreError::Validation { field, .. }) => assert_eq!(field, "name"),
        other => panic!("expected Validation, got: {:?}", other),
    }
    assert_eq!(store.get_identity("a").unwrap(), ident("a", "Alpha"));
}

fn second_insert_of_any_kind_is_duplicate<S: RecordStore>(mut store: S) {
    seed(&mut store);
    let typed = TypedConnector::uniform("c1", &Uuid::new("d"));
    store.insert_typed_connector(&typed).unwrap();
    store.insert_agent(&agent("a", "a")).unwrap();

    assert_duplicate(store.insert_identity(&ident("a", "renamed")), EntityKind::Identity);
    assert_duplicate(
        store.insert_node(&node("n1", "a", "b", ProperClass::Node)),
        EntityKind::Node,
    );
    assert_duplicate(
        store.insert_connector(&connector("c1", "c", ProperClass::Connector, "n1", "n2")),
        EntityKind::Connector,
    );
    assert_duplicate(store.insert_typed_connector(&typed), EntityKind::TypedConnector);
    assert_duplicate(store.insert_agent(&agent("a", "a")), EntityKind::Agent);
}

fn update_of_unknown_key_is_not_found<S: RecordStore>(mut store: S) {
    seed(&mut store);
    assert_not_found(store.update_identity(&ident("zz", "zz")), EntityKind::Identity);
    assert_not_found(
        store.update_node(&node("zz", "a", "b", ProperClass::Node)),
        EntityKind::Node,
    );
    assert_not_found(
        store.update_connector(&connector("zz", "c", ProperClass::Connector, "n1", "n2")),
        EntityKind::Connector,
    );
    assert_not_found(
        store.update_typed_connector(&TypedConnector::uniform("zz", &Uuid::new("a"))),
        EntityKind::TypedConnector,
    );
    assert_not_found(store.update_agent(&agent("zz", "a")), EntityKind::Agent);
}

fn update_replaces_fields<S: RecordStore>(mut store: S) {
    seed(&mut store);
    let renamed = Identity::new("a", "Alpha", "Alphas", "alpha", "alphas", "{}");
    store.update_identity(&renamed).unwrap();
    assert_eq!(store.get_identity("a").unwrap(), renamed);

    let moved = node("n2", "a", "b", ProperClass::Node)
        .within(Urr::new("n1"))
        .with_content(serde_json::json!({"x": 1}));
    store.update_node(&moved).unwrap();
    assert_eq!(store.get_node("n2").unwrap(), moved);

    let visibility = connector("c1", "d", ProperClass::Visibility, "n2", "n1");
    store.update_connector(&visibility).unwrap();
    assert_eq!(store.get_connector("c1").unwrap(), visibility);
    assert_eq!(store.count(EntityKind::Connector).unwrap(), 1);
}

fn update_to_missing_target_names_the_constraint<S: RecordStore>(mut store: S) {
    seed(&mut store);
    store
        .insert_typed_connector(&TypedConnector::uniform("c1", &Uuid::new("d")))
        .unwrap();
    store.insert_agent(&agent("a", "a")).unwrap();

    let base = node("n1", "a", "b", ProperClass::Node);
    assert_violates(
        store.update_node(&base.clone().with_category(Uuid::new("ghost"))),
        ForeignKey::NodeCategory,
    );
    assert_violates(
        store.update_node(&base.clone().within(Urr::new("ghost"))),
        ForeignKey::NodeContainer,
    );

    let edge = connector("c1", "c", ProperClass::Connector, "n1", "n2");
    assert_violates(
        store.update_connector(&edge.clone().with_from_node(Urr::new("ghost"))),
        ForeignKey::ConnectorFromNode,
    );
    assert_violates(
        store.update_connector(&edge.with_to_node(Urr::new("ghost"))),
        ForeignKey::ConnectorToNode,
    );

    let mut typed = TypedConnector::uniform("c1", &Uuid::new("d"));
    typed.is_container_from = Uuid::new("ghost");
    assert_violates(
        store.update_typed_connector(&typed),
        ForeignKey::TypedConnectorIsContainerFrom,
    );

    assert_violates(store.update_agent(&agent("a", "ghost")), ForeignKey::AgentUuid);

    // None of the rejected updates took effect.
    assert_eq!(store.get_node("n1").unwrap(), base);
    assert_eq!(store.get_agent("a").unwrap().uuid, Uuid::new("a"));
}

fn insert_with_missing_target_names_the_constraint<S: RecordStore>(mut store: S) {
    seed(&mut store);
    assert_violates(
        store.insert_node(&node("n3", "ghost", "b", ProperClass::Node)),
        ForeignKey::NodeUuid,
    );
    assert_violates(
        store.insert_connector(&connector("c2", "ghost", ProperClass::BoundaryReference, "n1", "n2")),
        ForeignKey::ConnectorCategory,
    );
    assert_violates(
        store.insert_typed_connector(&TypedConnector::uniform("ghost", &Uuid::new("a"))),
        ForeignKey::TypedConnectorUrr,
    );
    assert_violates(store.insert_agent(&agent("ghost", "a")), ForeignKey::AgentUrr);
    assert_eq!(store.count(EntityKind::Node).unwrap(), 2);
    assert_eq!(store.count(EntityKind::Agent).unwrap(), 0);
}

fn node_may_be_its_own_container<S: RecordStore>(mut store: S) {
    seed(&mut store);
    let root = node("self", "a", "b", ProperClass::Node).within(Urr::new("self"));
    store.insert_node(&root).unwrap();
    assert_eq!(store.get_node("self").unwrap().container, Some(Urr::new("self")));
}

fn reads_of_unknown_keys_are_not_found<S: RecordStore>(store: S) {
    assert!(matches!(store.get_identity("x"), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.get_node("x"), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.get_connector("x"), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.get_typed_connector("x"), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.get_agent("x"), Err(StoreError::NotFound { .. })));
    for entity in EntityKind::ALL {
        assert_eq!(store.count(entity).unwrap(), 0);
    }
}

fn identity_round_trip_holds<S: RecordStore>(make: fn() -> S) {
    let strategy = ("[a-z0-9-]{1,36}", "\\PC{0,100}", "\\PC{0,40}", "\\PC{0,40}");
    proptest!(ProptestConfig::with_cases(64), |((uuid, name, plural, payload) in strategy)| {
        let mut store = make();
        let identity = Identity::new(uuid.as_str(), name, plural, "code", "codes", payload);
        store.insert_identity(&identity).unwrap();
        prop_assert_eq!(store.get_identity(&uuid).unwrap(), identity);
    });
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

macro_rules! conformance {
    ($backend:ident, $make:expr) => {
        mod $backend {
            use super::*;

            fn store() -> impl RecordStore {
                $make
            }

            #[test]
            fn inserted_records_read_back_equal() {
                super::inserted_records_read_back_equal(store());
            }

            #[test]
            fn identity_with_long_name_is_never_written() {
                super::identity_with_long_name_is_never_written(store());
            }

            #[test]
            fn update_with_long_name_leaves_stored_row() {
                super::update_with_long_name_leaves_stored_row(store());
            }

            #[test]
            fn second_insert_of_any_kind_is_duplicate() {
                super::second_insert_of_any_kind_is_duplicate(store());
            }

            #[test]
            fn update_of_unknown_key_is_not_found() {
                super::update_of_unknown_key_is_not_found(store());
            }

            #[test]
            fn update_replaces_fields() {
                super::update_replaces_fields(store());
            }

            #[test]
            fn update_to_missing_target_names_the_constraint() {
                super::update_to_missing_target_names_the_constraint(store());
            }

            #[test]
            fn insert_with_missing_target_names_the_constraint() {
                super::insert_with_missing_target_names_the_constraint(store());
            }

            #[test]
            fn node_may_be_its_own_container() {
                super::node_may_be_its_own_container(store());
            }

            #[test]
            fn reads_of_unknown_keys_are_not_found() {
                super::reads_of_unknown_keys_are_not_found(store());
            }

            #[test]
            fn identity_round_trip_holds() {
                super::identity_round_trip_holds(store);
            }
        }
    };
}

conformance!(memory, cellstore_storage::InMemoryStore::new());
conformance!(sqlite, cellstore_storage::SqliteStore::in_memory().unwrap());
