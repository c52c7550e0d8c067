use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::graph::GraphClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub graph: Arc<GraphClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let graph = GraphClient::new(&config.graph)?;
        Ok(Self {
            config: Arc::new(config),
            graph: Arc::new(graph),
        })
    }
}
