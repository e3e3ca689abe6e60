//! # Shared Application State
//!
//! One `AppState` cloned into every handler: the database handle, the auth
//! service, and the mailer. All three are cheap to clone or `Arc`-wrapped.

use std::sync::Arc;

use mercado_db::Database;

use crate::auth::AuthService;
use crate::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<AuthService>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(db: Database, auth: AuthService, mailer: Arc<dyn Mailer>) -> Self {
        AppState {
            db,
            auth: Arc::new(auth),
            mailer,
        }
    }
}
