// Sat Jan 17 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Primitive size conventions of the compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataModel {
    /// 64-bit Unix: `long` and pointers are 8 bytes.
    Lp64,
    /// 64-bit Windows: `long` stays 4 bytes.
    Llp64,
    /// 32-bit targets.
    Ilp32,
}

impl Default for DataModel {
    fn default() -> Self {
        DataModel::Lp64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_model: DataModel,
    pub threads: usize,
    pub parallel: bool,
    pub skip_reserved_macros: bool,
    pub virtual_destructor_slots: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_model: DataModel::default(),
            threads: num_cpus::get(),
            parallel: true,
            skip_reserved_macros: true,
            virtual_destructor_slots: 1,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    pub fn with_data_model(mut self, data_model: DataModel) -> Self {
        self.data_model = data_model;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.threads == 0 {
            return Err("threads must be greater than 0".to_string());
        }
        if self.virtual_destructor_slots == 0 || self.virtual_destructor_slots > 2 {
            return Err("virtual_destructor_slots must be 1 or 2".to_string());
        }
        Ok(())
    }
}
