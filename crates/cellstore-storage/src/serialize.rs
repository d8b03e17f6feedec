//! Dependency-ordered persistence of a semantic graph.
//!
//! [`Serializer`] walks the domains reachable from a root and writes each
//! one through a [`RecordStore`]: naming records first, then structural
//! records grouped by proper class in [`ProperClass::STRUCTURAL_ORDER`], so
//! every foreign key points at a row written earlier. The first failed
//! write aborts the run; domains already written stay written.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use cellstore_core::{ElementId, EntityKind, GraphSource, ProperClass, StructuralRecord};

use crate::error::{SerializationError, StoreError};
use crate::traits::RecordStore;

/// Shared flag asking a running serializer to stop before its next write.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What one serializer run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SerializeSummary {
    /// Domains written to completion.
    pub domains: usize,
    pub identities: usize,
    /// Node, connector, and typed-connector rows.
    pub structural_rows: usize,
    /// Naming records skipped because their uuid already appeared in the
    /// same domain.
    pub skipped_identities: usize,
}

/// Where a single write happens, for logging and error reporting.
struct WriteSite<'a> {
    domain: &'a str,
    entity: EntityKind,
    kind: Option<ProperClass>,
    key: &'a str,
}

/// Writes the domains of a graph into a [`RecordStore`].
pub struct Serializer<'s, S: RecordStore + ?Sized> {
    store: &'s mut S,
    order: Vec<ProperClass>,
    cancellation: Option<CancellationFlag>,
    last_summary: Option<SerializeSummary>,
}

impl<'s, S: RecordStore + ?Sized> Serializer<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Serializer {
            store,
            order: ProperClass::STRUCTURAL_ORDER.to_vec(),
            cancellation: None,
            last_summary: None,
        }
    }

    /// Overrides the order structural kinds are written in. Kinds left out
    /// are not written at all.
    pub fn with_order(mut self, order: &[ProperClass]) -> Self {
        self.order = order.to_vec();
        self
    }

    /// Checks `flag` before every write.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Summary of the most recent run, including one that failed part way.
    pub fn last_summary(&self) -> Option<SerializeSummary> {
        self.last_summary
    }

    /// Persists every domain reachable from `root`, in traversal order.
    pub fn serialize(
        &mut self,
        source: &impl GraphSource,
        root: ElementId,
    ) -> Result<(), SerializationError> {
        let mut summary = SerializeSummary::default();
        let result = self.serialize_domains(source, root, &mut summary);
        self.last_summary = Some(summary);

        if result.is_ok() {
            tracing::info!(
                domains = summary.domains,
                identities = summary.identities,
                structural_rows = summary.structural_rows,
                skipped_identities = summary.skipped_identities,
                "serialization complete"
            );
        }
        result
    }

    fn serialize_domains(
        &mut self,
        source: &impl GraphSource,
        root: ElementId,
        summary: &mut SerializeSummary,
    ) -> Result<(), SerializationError> {
        let domains = source.contained_domains(root);
        if domains.is_empty() {
            tracing::debug!(root = root.0, "no domains to serialize");
        }

        for domain in domains {
            let label = source
                .domain_identity(domain)
                .map(|identity| identity.uuid.to_string())
                .unwrap_or_else(|| format!("#{}", domain.0));
            self.serialize_domain(source, domain, &label, summary)?;
            summary.domains += 1;
            tracing::info!(domain = %label, "domain stored");
        }
        Ok(())
    }

    fn serialize_domain(
        &mut self,
        source: &impl GraphSource,
        domain: ElementId,
        label: &str,
        summary: &mut SerializeSummary,
    ) -> Result<(), SerializationError> {
        let mut seen = HashSet::new();
        for identity in source.naming_records(domain) {
            if !seen.insert(identity.uuid.as_str()) {
                tracing::debug!(domain = %label, uuid = %identity.uuid, "skipping repeated naming record");
                summary.skipped_identities += 1;
                continue;
            }
            let site = WriteSite {
                domain: label,
                entity: EntityKind::Identity,
                kind: None,
                key: identity.uuid.as_str(),
            };
            self.write(&site, summary, |store| store.insert_identity(identity))?;
            summary.identities += 1;
        }

        let order = self.order.clone();
        for kind in order {
            for record in source.structural_records(domain, kind) {
                let site = WriteSite {
                    domain: label,
                    entity: EntityKind::Node,
                    kind: Some(kind),
                    key: record.key(),
                };
                match record {
                    StructuralRecord::Node(node) => {
                        self.write(&site, summary, |store| store.insert_node(node))?;
                    }
                    StructuralRecord::Connector(connector) => {
                        let site = WriteSite {
                            entity: EntityKind::Connector,
                            ..site
                        };
                        self.write(&site, summary, |store| store.insert_connector(connector))?;
                    }
                    StructuralRecord::Typed { base, extension } => {
                        let site = WriteSite {
                            entity: EntityKind::Connector,
                            ..site
                        };
                        self.write(&site, summary, |store| store.insert_connector(base))?;
                        summary.structural_rows += 1;
                        let site = WriteSite {
                            entity: EntityKind::TypedConnector,
                            ..site
                        };
                        self.write(&site, summary, |store| store.insert_typed_connector(extension))?;
                    }
                }
                summary.structural_rows += 1;
            }
        }
        Ok(())
    }

    /// Runs one store call, unless cancellation was requested.
    fn write(
        &mut self,
        site: &WriteSite<'_>,
        summary: &SerializeSummary,
        op: impl FnOnce(&mut S) -> Result<(), StoreError>,
    ) -> Result<(), SerializationError> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationFlag::is_cancelled)
        {
            tracing::info!(domain = %site.domain, completed = summary.domains, "serialization cancelled");
            return Err(SerializationError::Cancelled {
                domain: site.domain.to_string(),
                completed_domains: summary.domains,
            });
        }

        op(&mut *self.store).map_err(|source| {
            tracing::warn!(
                domain = %site.domain,
                entity = %site.entity,
                key = site.key,
                error = %source,
                "serialization aborted"
            );
            SerializationError::Store {
                domain: site.domain.to_string(),
                entity: site.entity,
                kind: site.kind,
                key: site.key.to_string(),
                source,
            }
        })?;

        tracing::debug!(domain = %site.domain, entity = %site.entity, key = site.key, "stored");
        Ok(())
    }
}

/// Persists every domain reachable from `root` in the default order.
pub fn serialize<S: RecordStore + ?Sized>(
    store: &mut S,
    source: &impl GraphSource,
    root: ElementId,
) -> Result<(), SerializationError> {
    Serializer::new(store).serialize(source, root)
}
