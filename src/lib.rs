pub mod cli;
pub mod config;
pub mod dto;
pub mod error;
pub mod forms;
pub mod models;
pub mod services;
pub mod utils;
pub mod views;

use crate::config::Config;
use crate::error::Result;
use crate::services::{job_api_service::JobApiService, toast_service::ToastService};
use std::time::Duration;

/// Shared capabilities handed to the board: the API client and the toast
/// stack. The confirmation capability is supplied separately.
#[derive(Clone)]
pub struct AppState {
    pub api: JobApiService,
    pub toasts: ToastService,
    pub highlight_duration: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let api = JobApiService::new(config.api_base.clone(), config.http_timeout)?;
        tracing::info!(api_base = %config.api_base, env = ?config.app_env, "Jobs API configured");

        Ok(Self {
            api,
            toasts: ToastService::new(config.toast_duration),
            highlight_duration: config.highlight_duration,
        })
    }
}
