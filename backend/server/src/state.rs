use std::sync::Arc;

use super::{
    config::Config,
    dataset::{Dataset, load_dataset},
    error::ConfigError,
};

pub struct State {
    pub config: Config,
    pub dataset: Dataset,
}

impl State {
    pub fn new() -> Result<Arc<Self>, ConfigError> {
        let config = Config::load()?;

        let dataset = load_dataset(config.dataset_path.as_deref())?;

        Ok(Self::with_dataset(config, dataset))
    }

    pub fn with_dataset(config: Config, dataset: Dataset) -> Arc<Self> {
        Arc::new(Self { config, dataset })
    }
}
