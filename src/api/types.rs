//! Shared types for the API layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::Db;
use crate::documents::DocumentService;
use crate::intelligence::ReviewGenerator;
use crate::news::NewsService;
use crate::storage::ObjectStore;
use crate::workflow::ReviewWorkflow;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Db,
    pub store: Arc<ObjectStore>,
    pub workflow: ReviewWorkflow,
    pub documents: DocumentService,
    pub news: Arc<NewsService>,
}

impl ApiContext {
    pub fn new(
        db: Db,
        store: Arc<ObjectStore>,
        generator: Arc<dyn ReviewGenerator>,
        news: Arc<NewsService>,
    ) -> Self {
        let workflow = ReviewWorkflow::new(db.clone(), store.clone(), generator.clone());
        let documents = DocumentService::new(db.clone(), generator);
        Self {
            db,
            store,
            workflow,
            documents,
            news,
        }
    }
}

/// Authenticated user, injected into request extensions by the auth
/// middleware after successful token resolution.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);
