//! Creator-based authorization for the four owned resource kinds.
//!
//! A caller may mutate a resource only if it created it. The gate answers
//! that question with a plain `bool`: a missing resource, a missing identity
//! and a failed lookup all answer `false`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::models::User;
use crate::services::{Database, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Helicopter,
    Engine,
    Attribute,
    AttributeValue,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Helicopter => "helicopter",
            ResourceKind::Engine => "engine",
            ResourceKind::Attribute => "attribute",
            ResourceKind::AttributeValue => "attribute_value",
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            ResourceKind::Helicopter => "helicopters",
            ResourceKind::Engine => "engines",
            ResourceKind::Attribute => "attributes",
            ResourceKind::AttributeValue => "attribute_values",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the creator of one resource kind by id.
#[async_trait]
pub trait CreatorLookup: Send + Sync {
    async fn find_creator_id(&self, id: i64) -> Result<Option<i64>, ServiceError>;
}

/// Reads `creator_id` from the table backing `kind`.
pub struct TableCreatorLookup {
    db: Database,
    kind: ResourceKind,
}

impl TableCreatorLookup {
    pub fn new(db: Database, kind: ResourceKind) -> Self {
        Self { db, kind }
    }
}

#[async_trait]
impl CreatorLookup for TableCreatorLookup {
    async fn find_creator_id(&self, id: i64) -> Result<Option<i64>, ServiceError> {
        self.db.find_creator_id(self.kind, id).await
    }
}

#[derive(Clone)]
pub struct OwnershipGate {
    helicopters: Arc<dyn CreatorLookup>,
    engines: Arc<dyn CreatorLookup>,
    attributes: Arc<dyn CreatorLookup>,
    attribute_values: Arc<dyn CreatorLookup>,
}

impl OwnershipGate {
    pub fn new(
        helicopters: Arc<dyn CreatorLookup>,
        engines: Arc<dyn CreatorLookup>,
        attributes: Arc<dyn CreatorLookup>,
        attribute_values: Arc<dyn CreatorLookup>,
    ) -> Self {
        Self {
            helicopters,
            engines,
            attributes,
            attribute_values,
        }
    }

    pub fn from_database(db: &Database) -> Self {
        let lookup = |kind| -> Arc<dyn CreatorLookup> {
            Arc::new(TableCreatorLookup::new(db.clone(), kind))
        };
        Self::new(
            lookup(ResourceKind::Helicopter),
            lookup(ResourceKind::Engine),
            lookup(ResourceKind::Attribute),
            lookup(ResourceKind::AttributeValue),
        )
    }

    fn lookup(&self, kind: ResourceKind) -> &dyn CreatorLookup {
        match kind {
            ResourceKind::Helicopter => self.helicopters.as_ref(),
            ResourceKind::Engine => self.engines.as_ref(),
            ResourceKind::Attribute => self.attributes.as_ref(),
            ResourceKind::AttributeValue => self.attribute_values.as_ref(),
        }
    }

    /// True only when the resource exists and `identity` created it.
    pub async fn is_creator(&self, kind: ResourceKind, id: i64, identity: Option<&User>) -> bool {
        let Some(identity) = identity else {
            return false;
        };

        match self.lookup(kind).find_creator_id(id).await {
            Ok(Some(creator_id)) => creator_id == identity.id,
            Ok(None) => false,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kind = %kind,
                    resource_id = id,
                    "Creator lookup failed, denying"
                );
                false
            }
        }
    }
}

/// In-memory creator lookup for tests.
pub struct MockCreatorLookup {
    pub creators: Mutex<HashMap<i64, i64>>,
    pub fail: bool,
}

impl Default for MockCreatorLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCreatorLookup {
    pub fn new() -> Self {
        Self {
            creators: Mutex::new(HashMap::new()),
            fail: false,
        }
    }

    /// A lookup whose every call fails.
    pub fn failing() -> Self {
        Self {
            creators: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    pub fn with(self, id: i64, creator_id: i64) -> Self {
        self.insert(id, creator_id);
        self
    }

    pub fn insert(&self, id: i64, creator_id: i64) {
        if let Ok(mut creators) = self.creators.lock() {
            creators.insert(id, creator_id);
        }
    }
}

#[async_trait]
impl CreatorLookup for MockCreatorLookup {
    async fn find_creator_id(&self, id: i64) -> Result<Option<i64>, ServiceError> {
        if self.fail {
            return Err(ServiceError::Database(sqlx::Error::PoolTimedOut));
        }
        let creators = self
            .creators
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock creator mutex poisoned: {}", e))?;
        Ok(creators.get(&id).copied())
    }
}
