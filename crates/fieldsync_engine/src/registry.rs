//! Handler registry and standard wiring.
//!
//! The registry is built once at startup and never mutated afterwards, so
//! lookups need no locking. [`standard_registry`] wires the full
//! field-reporting schema: every entity type, its repository, its relation
//! resolver, and the photo media sideload.

use crate::error::{EngineError, EngineResult};
use crate::handler::{RecordHandler, RelationResolver, TypeHandler};
use crate::media::MediaStore;
use fieldsync_core::entities::{
    blocked_user_fields, photo_fields, progress_fields, report_fields, user_fields, BlockedUser,
    Company, Parameter, Photo, Progress, ProgressStatus, Report, Role, User,
};
use fieldsync_core::{MemoryRepository, Repository, SyncRecord};
use fieldsync_document::Document;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Every entity type in a dependency-safe sync order: each type appears
/// after every type its relation resolvers look up.
pub const DEFAULT_SYNC_ORDER: [&str; 9] = [
    "parameters",
    "roles",
    "companies",
    "progress_statuses",
    "users",
    "blocked_users",
    "reports",
    "report_progress",
    "report_photos",
];

/// Immutable map from entity type name to its type-erased handler.
#[derive(Default)]
pub struct SyncRegistry {
    handlers: BTreeMap<&'static str, Arc<dyn RecordHandler>>,
}

impl SyncRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler, replacing any previous one for the same type.
    pub fn register(mut self, handler: Arc<dyn RecordHandler>) -> Self {
        info!(entity_type = handler.type_name(), "sync handler registered");
        self.handlers.insert(handler.type_name(), handler);
        self
    }

    /// True if a handler exists for the type.
    pub fn is_registered(&self, entity_type: &str) -> bool {
        self.handlers.contains_key(entity_type)
    }

    /// Registered type names, in name order.
    pub fn types(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// The subset of `requested` with no registered handler.
    pub fn unknown_types(&self, requested: &[String]) -> Vec<String> {
        requested
            .iter()
            .filter(|t| !self.is_registered(t))
            .cloned()
            .collect()
    }

    /// Looks a handler up, failing with [`EngineError::UnknownTypes`].
    pub fn handler(&self, entity_type: &str) -> EngineResult<Arc<dyn RecordHandler>> {
        self.handlers
            .get(entity_type)
            .cloned()
            .ok_or_else(|| EngineError::UnknownTypes {
                types: vec![entity_type.to_string()],
            })
    }
}

/// The repositories behind the full field-reporting schema.
///
/// Bundled so [`standard_registry`] and the relation resolvers can share
/// the same store instances.
#[derive(Clone)]
pub struct LocalStores {
    /// `parameters` store.
    pub parameters: Arc<dyn Repository<Parameter>>,
    /// `roles` store.
    pub roles: Arc<dyn Repository<Role>>,
    /// `users` store.
    pub users: Arc<dyn Repository<User>>,
    /// `blocked_users` store.
    pub blocked_users: Arc<dyn Repository<BlockedUser>>,
    /// `companies` store.
    pub companies: Arc<dyn Repository<Company>>,
    /// `progress_statuses` store.
    pub progress_statuses: Arc<dyn Repository<ProgressStatus>>,
    /// `reports` store.
    pub reports: Arc<dyn Repository<Report>>,
    /// `report_progress` store.
    pub progress: Arc<dyn Repository<Progress>>,
    /// `report_photos` store.
    pub photos: Arc<dyn Repository<Photo>>,
}

impl LocalStores {
    /// In-memory stores for every type, for tests and fixture runs.
    pub fn in_memory() -> Self {
        Self {
            parameters: Arc::new(MemoryRepository::<Parameter>::new()),
            roles: Arc::new(MemoryRepository::<Role>::new()),
            users: Arc::new(MemoryRepository::<User>::new()),
            blocked_users: Arc::new(MemoryRepository::<BlockedUser>::new()),
            companies: Arc::new(MemoryRepository::<Company>::new()),
            progress_statuses: Arc::new(MemoryRepository::<ProgressStatus>::new()),
            reports: Arc::new(MemoryRepository::<Report>::new()),
            progress: Arc::new(MemoryRepository::<Progress>::new()),
            photos: Arc::new(MemoryRepository::<Photo>::new()),
        }
    }
}

/// Resolves a required relation: the id must be present on the document
/// and must exist in the target store.
fn require_ref<T: SyncRecord>(
    target: &dyn Repository<T>,
    document: &Document,
    entity_type: &'static str,
    relation: &'static str,
    field: &str,
) -> EngineResult<i64> {
    let id = document
        .get_i64(field)
        .ok_or(EngineError::RelationMissing {
            entity_type,
            relation,
        })?;
    if !target.exists(id).map_err(EngineError::Core)? {
        return Err(EngineError::RelationNotFound {
            entity_type,
            relation,
            id,
        });
    }
    Ok(id)
}

/// Resolves an optional relation: an absent or null id resolves to `None`,
/// a present id must exist in the target store.
fn optional_ref<T: SyncRecord>(
    target: &dyn Repository<T>,
    document: &Document,
    entity_type: &'static str,
    relation: &'static str,
    field: &str,
) -> EngineResult<Option<i64>> {
    let Some(id) = document.get_i64(field) else {
        return Ok(None);
    };
    if !target.exists(id).map_err(EngineError::Core)? {
        return Err(EngineError::RelationNotFound {
            entity_type,
            relation,
            id,
        });
    }
    Ok(Some(id))
}

fn user_resolver(stores: &LocalStores) -> RelationResolver<User> {
    let roles = Arc::clone(&stores.roles);
    Box::new(move |user, document| {
        user.role_id = Some(require_ref(
            roles.as_ref(),
            document,
            User::TYPE_NAME,
            "role",
            user_fields::ROLE_ID,
        )?);
        Ok(())
    })
}

fn blocked_user_resolver(stores: &LocalStores) -> RelationResolver<BlockedUser> {
    let users = Arc::clone(&stores.users);
    Box::new(move |blocked, document| {
        blocked.user_id = Some(require_ref(
            users.as_ref(),
            document,
            BlockedUser::TYPE_NAME,
            "user",
            blocked_user_fields::USER_ID,
        )?);
        Ok(())
    })
}

fn report_resolver(stores: &LocalStores) -> RelationResolver<Report> {
    let users = Arc::clone(&stores.users);
    let companies = Arc::clone(&stores.companies);
    Box::new(move |report, document| {
        report.creator_id = Some(require_ref(
            users.as_ref(),
            document,
            Report::TYPE_NAME,
            "user",
            report_fields::CREATOR_ID,
        )?);
        report.company_id = optional_ref(
            companies.as_ref(),
            document,
            Report::TYPE_NAME,
            "company",
            report_fields::COMPANY_ID,
        )?;
        Ok(())
    })
}

fn progress_resolver(stores: &LocalStores) -> RelationResolver<Progress> {
    let users = Arc::clone(&stores.users);
    let statuses = Arc::clone(&stores.progress_statuses);
    let reports = Arc::clone(&stores.reports);
    Box::new(move |progress, document| {
        progress.user_id = Some(require_ref(
            users.as_ref(),
            document,
            Progress::TYPE_NAME,
            "user",
            progress_fields::USER_ID,
        )?);
        progress.status_id = Some(require_ref(
            statuses.as_ref(),
            document,
            Progress::TYPE_NAME,
            "status",
            progress_fields::STATUS_ID,
        )?);
        progress.report_id = Some(require_ref(
            reports.as_ref(),
            document,
            Progress::TYPE_NAME,
            "report",
            progress_fields::REPORT_ID,
        )?);
        Ok(())
    })
}

fn photo_resolver(stores: &LocalStores, media: Arc<MediaStore>) -> RelationResolver<Photo> {
    let reports = Arc::clone(&stores.reports);
    Box::new(move |photo, document| {
        let report_id = require_ref(
            reports.as_ref(),
            document,
            Photo::TYPE_NAME,
            "report",
            photo_fields::REPORT_ID,
        )?;
        photo.report_id = Some(report_id);

        // Media sideload: decode the inbound base64 payload to disk and
        // keep only the storage path. Decode failures are non-fatal and
        // leave the previous path in place.
        if let Some(payload) = document.get_str(photo_fields::PHOTO) {
            if let Some(path) = media.decode_and_store(payload, document.id(), Some(report_id)) {
                if let Some(previous) = photo.photo_path.take() {
                    if previous != path {
                        media.delete_if_exists(&previous);
                    }
                }
                photo.photo_path = Some(path);
            }
        }
        Ok(())
    })
}

/// Builds the registry for the full field-reporting schema.
///
/// Types without relations register plain handlers; the rest get resolvers
/// that enforce referential integrity against the same stores. `media`
/// backs the `report_photos` sideload.
pub fn standard_registry(stores: &LocalStores, media: Arc<MediaStore>) -> SyncRegistry {
    SyncRegistry::new()
        .register(Arc::new(TypeHandler::without_relations(Arc::clone(
            &stores.parameters,
        ))))
        .register(Arc::new(TypeHandler::without_relations(Arc::clone(
            &stores.roles,
        ))))
        .register(Arc::new(TypeHandler::without_relations(Arc::clone(
            &stores.companies,
        ))))
        .register(Arc::new(TypeHandler::without_relations(Arc::clone(
            &stores.progress_statuses,
        ))))
        .register(Arc::new(TypeHandler::new(
            Arc::clone(&stores.users),
            user_resolver(stores),
        )))
        .register(Arc::new(TypeHandler::new(
            Arc::clone(&stores.blocked_users),
            blocked_user_resolver(stores),
        )))
        .register(Arc::new(TypeHandler::new(
            Arc::clone(&stores.reports),
            report_resolver(stores),
        )))
        .register(Arc::new(TypeHandler::new(
            Arc::clone(&stores.progress),
            progress_resolver(stores),
        )))
        .register(Arc::new(TypeHandler::new(
            Arc::clone(&stores.photos),
            photo_resolver(stores, media),
        )))
}
