use crate::config::Config;
use crate::repository::PortalRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn PortalRepository>,
    pub config: Arc<Config>,
}
