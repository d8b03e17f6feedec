//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use cellstore_core::{
    Agent, Connector, ElementId, Identity, Node, ProperClass, SemanticGraph, StructuralRecord,
    TypedConnector, Urr, Uuid,
};

/// The giver identity of the "ithanku" model.
pub const GIVER: &str = "32779ea2-89cf-11df-a4ee-0800200c9a67";
/// The native-language identity of the "ernst" model.
pub const ERNST_NATIVE_LANGUAGE: &str = "3277c5b8-89cf-11df-a4ee-0800200c9a67";

pub fn ident(uuid: &str, name: &str) -> Identity {
    Identity::named(uuid, name)
}

pub fn node(urr: &str, uuid: &str, category: &str, class: ProperClass) -> Node {
    Node::new(urr, Uuid::new(uuid), Uuid::new(category), class)
}

pub fn connector(urr: &str, category: &str, class: ProperClass, from: &str, to: &str) -> Connector {
    Connector::new(urr, Uuid::new(category), class, Urr::new(from), Urr::new(to))
        .expect("connector class")
}

pub fn agent(urr: &str, uuid: &str) -> Agent {
    Agent {
        urr: Urr::new(urr),
        uuid: Uuid::new(uuid),
        email: "ada@example.org".into(),
        password: "secret".into(),
        mobile: "+44 20 7946 0000".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        alias: "ada".into(),
    }
}

/// Uuid of the n-th identity of the "ithanku" model; index 0 is the giver.
pub fn ithanku_uuid(n: usize) -> String {
    if n == 0 {
        GIVER.to_string()
    } else {
        format!("32779ea2-89cf-11df-a4ee-0800200c9b{n:02x}")
    }
}

const ITHANKU_NAMES: [&str; 15] = [
    "Giver",
    "Receiver",
    "Gift",
    "Thanks",
    "Occasion",
    "Entity",
    "Gives",
    "Receives",
    "ExpressesThanks",
    "SendThanks",
    "ListGifts",
    "Zero",
    "Many",
    "True",
    "EdgeEnd",
];

/// A single-domain graph with 15 naming records and structural records of
/// every kind, each referencing only those 15.
pub fn ithanku_graph() -> (SemanticGraph, Vec<String>) {
    let mut graph = SemanticGraph::new(ident("root", "Models"));
    let root = graph.root();
    let models = graph.add_set(root, ident("models", "Models")).unwrap();
    let domain = graph.add_domain(models, ident("ithanku", "ithanku")).unwrap();

    let uuids: Vec<String> = (0..15).map(ithanku_uuid).collect();
    for (uuid, name) in uuids.iter().zip(ITHANKU_NAMES) {
        graph.add_identity(domain, ident(uuid, name)).unwrap();
    }
    let id = |n: usize| uuids[n].as_str();
    let entity = id(5);

    // Added out of kind order; the serializer regroups them.
    add(&mut graph, domain, StructuralRecord::Node(node("send-thanks", id(9), entity, ProperClass::Command)));
    add(
        &mut graph,
        domain,
        StructuralRecord::Connector(connector("receives", id(7), ProperClass::Visibility, "receiver", "gift")),
    );
    add(&mut graph, domain, StructuralRecord::Node(node("giver", id(0), entity, ProperClass::Node)));
    add(
        &mut graph,
        domain,
        StructuralRecord::Node(node("gift", id(2), entity, ProperClass::Node).within(Urr::new("giver"))),
    );
    add(&mut graph, domain, StructuralRecord::Node(node("receiver", id(1), entity, ProperClass::Node)));
    add(&mut graph, domain, StructuralRecord::Node(node("list-gifts", id(10), entity, ProperClass::Query)));

    let mut extension = TypedConnector::uniform("gives", &Uuid::new(id(13)));
    extension.min_from = Uuid::new(id(11));
    extension.min_to = Uuid::new(id(11));
    extension.max_from = Uuid::new(id(12));
    extension.max_to = Uuid::new(id(12));
    extension.from_edge_end = Uuid::new(id(14));
    extension.to_edge_end = Uuid::new(id(14));
    add(
        &mut graph,
        domain,
        StructuralRecord::typed(connector("gives", id(6), ProperClass::Connector, "giver", "gift"), extension)
            .unwrap(),
    );
    add(
        &mut graph,
        domain,
        StructuralRecord::Connector(connector(
            "thanks-boundary",
            id(8),
            ProperClass::BoundaryReference,
            "receiver",
            "giver",
        )),
    );

    (graph, uuids)
}

/// A single-domain graph with five naming records and nothing structural.
pub fn ernst_graph() -> (SemanticGraph, Vec<String>) {
    let mut graph = SemanticGraph::new(ident("root", "Models"));
    let root = graph.root();
    let domain = graph.add_domain(root, ident("ernst", "ernst")).unwrap();

    let mut uuids = vec![ERNST_NATIVE_LANGUAGE.to_string()];
    uuids.extend((1..5).map(|n| format!("3277c5b8-89cf-11df-a4ee-0800200c9b{n:02x}")));
    let names = ["ErnstNativeLanguage", "Person", "Language", "Speaks", "Ernst"];
    for (uuid, name) in uuids.iter().zip(names) {
        graph.add_identity(domain, ident(uuid, name)).unwrap();
    }
    (graph, uuids)
}

fn add(graph: &mut SemanticGraph, domain: ElementId, record: StructuralRecord) {
    graph.add_structural(domain, record).unwrap();
}
