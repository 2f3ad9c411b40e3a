//! # Application State
//!
//! Shared state handed to every route through the `State` extractor. Both
//! members are trait objects so tests can substitute doubles.

use std::sync::Arc;

use tax_core::{SettingsRepository, TaxCalculator};

#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<dyn TaxCalculator>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl AppState {
    pub fn new(
        calculator: Arc<dyn TaxCalculator>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            calculator,
            settings,
        }
    }
}
