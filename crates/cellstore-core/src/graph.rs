//! SemanticGraph: the polymorphic in-memory graph handed to a serializer.
//!
//! The graph is a petgraph `StableGraph` of [`Element`]s joined by
//! `Contains` edges. Element roles form a closed set of tagged variants:
//! plain sets (the root, intermediate containers), semantic-domain
//! boundaries, naming records, and structural records. Consumers match on
//! the tag; there is no runtime type filtering.
//!
//! # Ordering
//!
//! Children are always reported in insertion order. petgraph yields
//! outgoing edges newest-first, so child lists are sorted by edge index,
//! which grows monotonically because elements are never removed.
//!
//! The [`GraphSource`] trait is the read-only view a serializer needs. It is
//! implemented here for [`SemanticGraph`] but any graph provider can supply
//! one.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::connector::{Connector, TypedConnector};
use crate::error::ModelError;
use crate::identity::Identity;
use crate::node::Node;
use crate::proper_class::ProperClass;

/// Stable identifier of an element. Maps to a petgraph `NodeIndex<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl From<NodeIndex<u32>> for ElementId {
    fn from(idx: NodeIndex<u32>) -> Self {
        ElementId(idx.index() as u32)
    }
}

impl From<ElementId> for NodeIndex<u32> {
    fn from(id: ElementId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}

/// A record that lands in one of the structural tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralRecord {
    /// A node row. Commands and queries are nodes with the matching class.
    Node(Node),
    /// A plain connector row.
    Connector(Connector),
    /// A connector row plus its typed-connector extension row.
    Typed {
        base: Connector,
        extension: TypedConnector,
    },
}

impl StructuralRecord {
    /// Pairs a connector with its extension, which must share its urr.
    pub fn typed(base: Connector, extension: TypedConnector) -> Result<Self, ModelError> {
        if base.urr() != &extension.urr {
            return Err(ModelError::SpecializationMismatch {
                base: base.urr().to_string(),
                extension: extension.urr.to_string(),
            });
        }
        Ok(StructuralRecord::Typed { base, extension })
    }

    /// The kind this record is grouped under when persisting.
    pub fn kind(&self) -> ProperClass {
        match self {
            StructuralRecord::Node(node) => node.proper_class,
            StructuralRecord::Connector(connector) => connector.proper_class(),
            StructuralRecord::Typed { base, .. } => base.proper_class(),
        }
    }

    /// Primary key of the (base) row.
    pub fn key(&self) -> &str {
        match self {
            StructuralRecord::Node(node) => node.urr.as_str(),
            StructuralRecord::Connector(connector) => connector.urr().as_str(),
            StructuralRecord::Typed { base, .. } => base.urr().as_str(),
        }
    }
}

/// A vertex of the semantic graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// A plain container (the graph root, or a grouping inside it).
    Set(Identity),
    /// A semantic-domain boundary.
    Domain(Identity),
    /// A naming record.
    Identity(Identity),
    /// A structural record.
    Structural(StructuralRecord),
}

impl Element {
    /// Returns `true` if this element may have children.
    pub fn is_container(&self) -> bool {
        matches!(self, Element::Set(_) | Element::Domain(_))
    }
}

/// Edge kinds of the semantic graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphEdge {
    Contains,
}

/// Read-only view of a polymorphic graph, as needed by a serializer.
pub trait GraphSource {
    /// Domain boundaries reachable from `root`, in traversal order.
    fn contained_domains(&self, root: ElementId) -> Vec<ElementId>;

    /// The identity naming a domain, if `domain` is one.
    fn domain_identity(&self, domain: ElementId) -> Option<&Identity>;

    /// Naming records directly contained in `domain`, in enumeration order.
    fn naming_records(&self, domain: ElementId) -> Vec<&Identity>;

    /// Structural records directly contained in `domain` whose kind is
    /// `kind`, in enumeration order.
    fn structural_records(&self, domain: ElementId, kind: ProperClass) -> Vec<&StructuralRecord>;
}

/// The in-memory polymorphic graph.
#[derive(Debug, Clone)]
pub struct SemanticGraph {
    graph: StableGraph<Element, GraphEdge, Directed, u32>,
    root: NodeIndex<u32>,
}

impl SemanticGraph {
    /// Creates a graph whose root is a plain set named by `root`.
    pub fn new(root: Identity) -> Self {
        let mut graph = StableGraph::new();
        let root = graph.add_node(Element::Set(root));
        SemanticGraph { graph, root }
    }

    pub fn root(&self) -> ElementId {
        self.root.into()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.graph.node_weight(id.into())
    }

    pub fn element_count(&self) -> usize {
        self.graph.node_count()
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    pub fn add_set(&mut self, parent: ElementId, identity: Identity) -> Result<ElementId, ModelError> {
        self.add_child(parent, Element::Set(identity))
    }

    pub fn add_domain(&mut self, parent: ElementId, identity: Identity) -> Result<ElementId, ModelError> {
        self.add_child(parent, Element::Domain(identity))
    }

    pub fn add_identity(&mut self, parent: ElementId, identity: Identity) -> Result<ElementId, ModelError> {
        self.add_child(parent, Element::Identity(identity))
    }

    pub fn add_structural(
        &mut self,
        parent: ElementId,
        record: StructuralRecord,
    ) -> Result<ElementId, ModelError> {
        self.add_child(parent, Element::Structural(record))
    }

    /// Adds `element` under `parent`, which must exist and be a container.
    pub fn add_child(&mut self, parent: ElementId, element: Element) -> Result<ElementId, ModelError> {
        let parent_idx: NodeIndex<u32> = parent.into();
        match self.graph.node_weight(parent_idx) {
            None => return Err(ModelError::UnknownElement { id: parent }),
            Some(p) if !p.is_container() => return Err(ModelError::NotAContainer { id: parent }),
            Some(_) => {}
        }
        let child = self.graph.add_node(element);
        self.graph.add_edge(parent_idx, child, GraphEdge::Contains);
        Ok(child.into())
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Direct children of `id`, in insertion order.
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        let mut edges: Vec<(EdgeIndex<u32>, NodeIndex<u32>)> = self
            .graph
            .edges_directed(id.into(), Direction::Outgoing)
            .filter(|e| *e.weight() == GraphEdge::Contains)
            .map(|e| (e.id(), e.target()))
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, target)| target.into()).collect()
    }

    fn child_elements(&self, id: ElementId) -> impl Iterator<Item = &Element> {
        self.children(id)
            .into_iter()
            .filter_map(move |child| self.get(child))
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    /// Builds a graph from its JSON document form.
    pub fn from_document(document: GraphDocument) -> Result<Self, ModelError> {
        let mut graph = SemanticGraph::new(document.root);
        let root = graph.root();
        graph.attach(root, document.children)?;
        Ok(graph)
    }

    fn attach(&mut self, parent: ElementId, elements: Vec<DocumentElement>) -> Result<(), ModelError> {
        for element in elements {
            match element {
                DocumentElement::Set { identity, children } => {
                    let id = self.add_set(parent, identity)?;
                    self.attach(id, children)?;
                }
                DocumentElement::Domain { identity, children } => {
                    let id = self.add_domain(parent, identity)?;
                    self.attach(id, children)?;
                }
                DocumentElement::Identity(identity) => {
                    self.add_identity(parent, identity)?;
                }
                DocumentElement::Node(node) => {
                    self.add_structural(parent, StructuralRecord::Node(node))?;
                }
                DocumentElement::Connector(connector) => {
                    self.add_structural(parent, StructuralRecord::Connector(connector))?;
                }
                DocumentElement::TypedConnector { base, extension } => {
                    self.add_structural(parent, StructuralRecord::typed(base, extension)?)?;
                }
            }
        }
        Ok(())
    }
}

impl GraphSource for SemanticGraph {
    /// Pre-order walk from `root`. Nested domains follow their enclosing
    /// domain; a root that is itself a domain is reported first.
    fn contained_domains(&self, root: ElementId) -> Vec<ElementId> {
        let mut domains = Vec::new();
        if self.get(root).is_none() {
            return domains;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(element) = self.get(id) else {
                continue;
            };
            if matches!(element, Element::Domain(_)) {
                domains.push(id);
            }
            if element.is_container() {
                let mut children = self.children(id);
                children.reverse();
                stack.extend(children);
            }
        }
        domains
    }

    fn domain_identity(&self, domain: ElementId) -> Option<&Identity> {
        match self.get(domain)? {
            Element::Domain(identity) => Some(identity),
            _ => None,
        }
    }

    fn naming_records(&self, domain: ElementId) -> Vec<&Identity> {
        self.child_elements(domain)
            .filter_map(|element| match element {
                Element::Identity(identity) => Some(identity),
                _ => None,
            })
            .collect()
    }

    fn structural_records(&self, domain: ElementId, kind: ProperClass) -> Vec<&StructuralRecord> {
        self.child_elements(domain)
            .filter_map(|element| match element {
                Element::Structural(record) if record.kind() == kind => Some(record),
                _ => None,
            })
            .collect()
    }
}

/// JSON form of a [`SemanticGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub root: Identity,
    #[serde(default)]
    pub children: Vec<DocumentElement>,
}

/// One element of a [`GraphDocument`], tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentElement {
    Set {
        identity: Identity,
        #[serde(default)]
        children: Vec<DocumentElement>,
    },
    Domain {
        identity: Identity,
        #[serde(default)]
        children: Vec<DocumentElement>,
    },
    Identity(Identity),
    Node(Node),
    Connector(Connector),
    TypedConnector {
        base: Connector,
        extension: TypedConnector,
    },
}
