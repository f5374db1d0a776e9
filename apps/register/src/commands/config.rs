//! # Config Commands
//!
//! Retrieving application configuration.

use tracing::debug;

use crate::state::{AppConfig, AppState};

/// Gets the current application configuration.
///
/// ## When Used
/// - Renderer startup (business name in the header)
/// - Receipt printing (name, tagline)
/// - Currency formatting
pub fn get_config(state: &AppState) -> AppConfig {
    debug!("get_config command");
    (*state.config).clone()
}
