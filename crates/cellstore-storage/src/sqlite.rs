//! SQLite implementation of [`RecordStore`].
//!
//! [`SqliteStore`] persists model records in a SQLite database with WAL
//! mode, one transaction per write, and automatic schema migrations.
//! Node content is stored as JSON TEXT via serde_json.
//!
//! Foreign keys are deferred inside each write transaction. Before it
//! commits, the store looks up each parent key the new row references, by
//! primary key and in catalogue order, so a referential integrity error
//! names its constraint without consulting any error message.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use cellstore_core::{
    Agent, Cardinality, Connector, EntityKind, Identity, Node, ProperClass, Record,
    TypedConnector, UncheckedConnector, Urr, Uuid,
};

use crate::config::StoreConfig;
use crate::constraint::{BackendFailure, ConstraintClassifier, WriteContext, WriteOp};
use crate::error::StoreError;
use crate::traits::RecordStore;

/// SQLite-backed implementation of [`RecordStore`].
///
/// Every write operation is wrapped in its own transaction. The database
/// uses WAL mode for performance and foreign keys for integrity.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        Self::open(&StoreConfig::at(path))
    }

    /// Opens the database described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = crate::schema::open_database(&config.db_path, config.busy_timeout())?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Runs one single-row write in its own transaction.
    ///
    /// The write lock is taken when the transaction begins, so concurrent
    /// writers queue on the busy timeout. Any failure drops the
    /// transaction, which rolls it back.
    fn write_row<R: Record>(
        &mut self,
        record: &R,
        op: WriteOp,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<(), StoreError> {
        record.validate()?;
        let ctx = WriteContext::new(R::KIND, record.key(), op);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.pragma_update(None, "defer_foreign_keys", "ON")?;

        let rows = tx
            .execute(sql, params)
            .map_err(|err| reject(BackendFailure::from_sqlite(&err), &ctx))?;
        if rows == 0 {
            return Err(reject(BackendFailure::NoRowsAffected, &ctx));
        }
        if let Some(failure) = unresolved_reference(&tx, record)? {
            return Err(reject(failure, &ctx));
        }

        tx.commit()
            .map_err(|err| reject(BackendFailure::from_sqlite(&err), &ctx))?;
        tracing::debug!(entity = %ctx.entity, key = ctx.key, ?op, "row written");
        Ok(())
    }

    fn not_found(entity: EntityKind, key: &str) -> StoreError {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Classifies and logs a rejected write.
fn reject(failure: BackendFailure, ctx: &WriteContext<'_>) -> StoreError {
    let err = ConstraintClassifier::classify(failure, ctx);
    tracing::warn!(entity = %ctx.entity, key = ctx.key, error = %err, "write rejected");
    err
}

/// Existence check for one parent row, keyed by its primary key.
fn parent_lookup_sql(parent: EntityKind) -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
        parent.table(),
        parent.key_column()
    )
}

/// The first reference of `record` with no parent row, in catalogue order.
///
/// Runs inside the write's own transaction, so a row may resolve against
/// itself.
fn unresolved_reference<R: Record>(
    conn: &Connection,
    record: &R,
) -> Result<Option<BackendFailure>, StoreError> {
    for (fk, value) in record.references() {
        let exists: bool = conn
            .prepare_cached(&parent_lookup_sql(fk.parent()))?
            .query_row(params![value], |row| row.get(0))?;
        if !exists {
            return Ok(Some(BackendFailure::ForeignKeyUnresolved(fk)));
        }
    }
    Ok(None)
}

fn parse_class(raw: &str) -> Result<ProperClass, StoreError> {
    Ok(raw.parse::<ProperClass>()?)
}

impl RecordStore for SqliteStore {
    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    fn insert_identity(&mut self, identity: &Identity) -> Result<(), StoreError> {
        self.write_row(
            identity,
            WriteOp::Insert,
            "INSERT INTO identity (uuid, name, plural_name, code_name, plural_code_name, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                identity.uuid.as_str(),
                identity.name,
                identity.plural_name,
                identity.code_name,
                identity.plural_code_name,
                identity.payload,
            ],
        )
    }

    fn update_identity(&mut self, identity: &Identity) -> Result<(), StoreError> {
        self.write_row(
            identity,
            WriteOp::Update,
            "UPDATE identity SET name = ?2, plural_name = ?3, code_name = ?4,
             plural_code_name = ?5, payload = ?6 WHERE uuid = ?1",
            params![
                identity.uuid.as_str(),
                identity.name,
                identity.plural_name,
                identity.code_name,
                identity.plural_code_name,
                identity.payload,
            ],
        )
    }

    fn get_identity(&self, uuid: &str) -> Result<Identity, StoreError> {
        self.conn
            .query_row(
                "SELECT uuid, name, plural_name, code_name, plural_code_name, payload
                 FROM identity WHERE uuid = ?1",
                params![uuid],
                |row| {
                    Ok(Identity {
                        uuid: Uuid(row.get(0)?),
                        name: row.get(1)?,
                        plural_name: row.get(2)?,
                        code_name: row.get(3)?,
                        plural_code_name: row.get(4)?,
                        payload: row.get(5)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::Identity, uuid))
    }

    // -----------------------------------------------------------------------
    // Node
    // -----------------------------------------------------------------------

    fn insert_node(&mut self, node: &Node) -> Result<(), StoreError> {
        let content = serde_json::to_string(&node.content)?;
        self.write_row(
            node,
            WriteOp::Insert,
            "INSERT INTO node (urr, uuid, category, container, is_abstract, proper_class,
             max_cardinality_in_container, content) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                node.urr.as_str(),
                node.uuid.as_str(),
                node.category.as_str(),
                node.container.as_ref().map(Urr::as_str),
                node.is_abstract as i32,
                node.proper_class.as_str(),
                node.max_cardinality_in_container.to_column(),
                content,
            ],
        )
    }

    fn update_node(&mut self, node: &Node) -> Result<(), StoreError> {
        let content = serde_json::to_string(&node.content)?;
        self.write_row(
            node,
            WriteOp::Update,
            "UPDATE node SET uuid = ?2, category = ?3, container = ?4, is_abstract = ?5,
             proper_class = ?6, max_cardinality_in_container = ?7, content = ?8
             WHERE urr = ?1",
            params![
                node.urr.as_str(),
                node.uuid.as_str(),
                node.category.as_str(),
                node.container.as_ref().map(Urr::as_str),
                node.is_abstract as i32,
                node.proper_class.as_str(),
                node.max_cardinality_in_container.to_column(),
                content,
            ],
        )
    }

    fn get_node(&self, urr: &str) -> Result<Node, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT urr, uuid, category, container, is_abstract, proper_class,
                 max_cardinality_in_container, content FROM node WHERE urr = ?1",
                params![urr],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, bool>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, Option<u32>>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .optional()?;

        let Some((urr, uuid, category, container, is_abstract, class, cardinality, content)) = row
        else {
            return Err(Self::not_found(EntityKind::Node, urr));
        };

        Ok(Node {
            urr: Urr(urr),
            uuid: Uuid(uuid),
            category: Uuid(category),
            container: container.map(Urr),
            is_abstract,
            proper_class: parse_class(&class)?,
            max_cardinality_in_container: Cardinality::from_column(cardinality),
            content: serde_json::from_str(&content)?,
        })
    }

    // -----------------------------------------------------------------------
    // Connector
    // -----------------------------------------------------------------------

    fn insert_connector(&mut self, connector: &Connector) -> Result<(), StoreError> {
        self.write_row(
            connector,
            WriteOp::Insert,
            "INSERT INTO connector (urr, category, proper_class, from_node, to_node)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                connector.urr().as_str(),
                connector.category().as_str(),
                connector.proper_class().as_str(),
                connector.from_node().as_str(),
                connector.to_node().as_str(),
            ],
        )
    }

    fn update_connector(&mut self, connector: &Connector) -> Result<(), StoreError> {
        self.write_row(
            connector,
            WriteOp::Update,
            "UPDATE connector SET category = ?2, proper_class = ?3, from_node = ?4, to_node = ?5
             WHERE urr = ?1",
            params![
                connector.urr().as_str(),
                connector.category().as_str(),
                connector.proper_class().as_str(),
                connector.from_node().as_str(),
                connector.to_node().as_str(),
            ],
        )
    }

    fn get_connector(&self, urr: &str) -> Result<Connector, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT urr, category, proper_class, from_node, to_node
                 FROM connector WHERE urr = ?1",
                params![urr],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((urr, category, class, from_node, to_node)) = row else {
            return Err(Self::not_found(EntityKind::Connector, urr));
        };

        let raw = UncheckedConnector {
            urr: Urr(urr),
            category: Uuid(category),
            proper_class: Some(parse_class(&class)?),
            from_node: Urr(from_node),
            to_node: Urr(to_node),
        };
        Ok(Connector::try_from(raw)?)
    }

    // -----------------------------------------------------------------------
    // Typed connector
    // -----------------------------------------------------------------------

    fn insert_typed_connector(&mut self, typed: &TypedConnector) -> Result<(), StoreError> {
        self.write_row(
            typed,
            WriteOp::Insert,
            "INSERT INTO typed_connector (urr, min_from, min_to, max_from, max_to,
             is_navigable_from, is_navigable_to, is_container_from, is_container_to,
             from_edge_end, to_edge_end)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                typed.urr.as_str(),
                typed.min_from.as_str(),
                typed.min_to.as_str(),
                typed.max_from.as_str(),
                typed.max_to.as_str(),
                typed.is_navigable_from.as_str(),
                typed.is_navigable_to.as_str(),
                typed.is_container_from.as_str(),
                typed.is_container_to.as_str(),
                typed.from_edge_end.as_str(),
                typed.to_edge_end.as_str(),
            ],
        )
    }

    fn update_typed_connector(&mut self, typed: &TypedConnector) -> Result<(), StoreError> {
        self.write_row(
            typed,
            WriteOp::Update,
            "UPDATE typed_connector SET min_from = ?2, min_to = ?3, max_from = ?4, max_to = ?5,
             is_navigable_from = ?6, is_navigable_to = ?7, is_container_from = ?8,
             is_container_to = ?9, from_edge_end = ?10, to_edge_end = ?11
             WHERE urr = ?1",
            params![
                typed.urr.as_str(),
                typed.min_from.as_str(),
                typed.min_to.as_str(),
                typed.max_from.as_str(),
                typed.max_to.as_str(),
                typed.is_navigable_from.as_str(),
                typed.is_navigable_to.as_str(),
                typed.is_container_from.as_str(),
                typed.is_container_to.as_str(),
                typed.from_edge_end.as_str(),
                typed.to_edge_end.as_str(),
            ],
        )
    }

    fn get_typed_connector(&self, urr: &str) -> Result<TypedConnector, StoreError> {
        self.conn
            .query_row(
                "SELECT urr, min_from, min_to, max_from, max_to, is_navigable_from,
                 is_navigable_to, is_container_from, is_container_to, from_edge_end, to_edge_end
                 FROM typed_connector WHERE urr = ?1",
                params![urr],
                |row| {
                    Ok(TypedConnector {
                        urr: Urr(row.get(0)?),
                        min_from: Uuid(row.get(1)?),
                        min_to: Uuid(row.get(2)?),
                        max_from: Uuid(row.get(3)?),
                        max_to: Uuid(row.get(4)?),
                        is_navigable_from: Uuid(row.get(5)?),
                        is_navigable_to: Uuid(row.get(6)?),
                        is_container_from: Uuid(row.get(7)?),
                        is_container_to: Uuid(row.get(8)?),
                        from_edge_end: Uuid(row.get(9)?),
                        to_edge_end: Uuid(row.get(10)?),
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::TypedConnector, urr))
    }

    // -----------------------------------------------------------------------
    // Agent
    // -----------------------------------------------------------------------

    fn insert_agent(&mut self, agent: &Agent) -> Result<(), StoreError> {
        self.write_row(
            agent,
            WriteOp::Insert,
            "INSERT INTO agent (urr, uuid, email, password, mobile, first_name, last_name, alias)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                agent.urr.as_str(),
                agent.uuid.as_str(),
                agent.email,
                agent.password,
                agent.mobile,
                agent.first_name,
                agent.last_name,
                agent.alias,
            ],
        )
    }

    fn update_agent(&mut self, agent: &Agent) -> Result<(), StoreError> {
        self.write_row(
            agent,
            WriteOp::Update,
            "UPDATE agent SET uuid = ?2, email = ?3, password = ?4, mobile = ?5,
             first_name = ?6, last_name = ?7, alias = ?8 WHERE urr = ?1",
            params![
                agent.urr.as_str(),
                agent.uuid.as_str(),
                agent.email,
                agent.password,
                agent.mobile,
                agent.first_name,
                agent.last_name,
                agent.alias,
            ],
        )
    }

    fn get_agent(&self, urr: &str) -> Result<Agent, StoreError> {
        self.conn
            .query_row(
                "SELECT urr, uuid, email, password, mobile, first_name, last_name, alias
                 FROM agent WHERE urr = ?1",
                params![urr],
                |row| {
                    Ok(Agent {
                        urr: Urr(row.get(0)?),
                        uuid: Uuid(row.get(1)?),
                        email: row.get(2)?,
                        password: row.get(3)?,
                        mobile: row.get(4)?,
                        first_name: row.get(5)?,
                        last_name: row.get(6)?,
                        alias: row.get(7)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::Agent, urr))
    }

    // -----------------------------------------------------------------------
    // Query methods
    // -----------------------------------------------------------------------

    fn count(&self, entity: EntityKind) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT({}) FROM {}", entity.key_column(), entity.table());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
