use anyhow::Result;

use crate::infra::{config::AppConfig, contracts::ConfigAdapter};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter {
    pub config: AppConfig,
}

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_config_returns_configured_value() {
        let mut config = AppConfig::default();
        config.backend.base_url = "http://stub:1".to_owned();
        let adapter = StubConfigAdapter {
            config: config.clone(),
        };

        assert_eq!(adapter.load().expect("stub config must load"), config);
    }
}
