use std::sync::Arc;
use crate::domain::ports::{BookingRepository, EventTypeRepository};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_type_repo: Arc<dyn EventTypeRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
}
