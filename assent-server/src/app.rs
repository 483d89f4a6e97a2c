use std::{ops::Deref, path::Path, sync::Arc};

use anyhow::{Context, Result};
use tracing::info;

use assent_pim::{statement, Regexp, StaticWarden, Warden};

use crate::AppConfig;

pub struct App {
    pub config: AppConfig,
    pub warden: Arc<dyn Warden>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("initializing policy warden...");

        let statements = match &config.policy_file {
            Some(path) => statement::load(Path::new(path))
                .with_context(|| format!("could not load policies from {path}"))?,
            None => Vec::new(),
        };
        info!("{} policy statements loaded", statements.len());

        let warden = StaticWarden::new(
            Regexp::new(config.cache_size)
                .context("could not initialize pattern cache")?,
            statements,
        );
        info!("policy warden successfully initialized!");
        Ok(Self::with_warden(config, Arc::new(warden)))
    }

    /// Builds the application around an already constructed warden.
    pub fn with_warden(config: AppConfig, warden: Arc<dyn Warden>) -> Self {
        Self { config, warden }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct AppState(pub Arc<App>);

// deref so you can still access the inner fields easily
impl Deref for AppState {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
