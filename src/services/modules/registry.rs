//! ModuleRegistry - モジュール名と処理実装の対応表

use super::simulated::SimulatedModule;
use crate::core::{BatchError, BatchResult, ModuleContract};
use std::sync::Arc;
use std::time::Duration;

/// 組み込みモジュール名（登録順）
pub const BUILTIN_MODULES: [&str; 4] = [
    "Test Data Extraction",
    "Test JSON Output (Windows DLL)",
    "Test JSON Output (Linux DLL)",
    "Test Automatic Drawing",
];

/// 登録順を保つモジュール一覧
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<(String, Arc<dyn ModuleContract>)>,
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.names())
            .finish()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込みの4モジュールを `SimulatedModule` で登録
    pub fn with_defaults() -> Self {
        Self::with_simulated_delay(SimulatedModule::DEFAULT_DELAY)
    }

    pub fn with_simulated_delay(delay: Duration) -> Self {
        let mut registry = Self::new();
        for name in BUILTIN_MODULES {
            registry.register(name, Arc::new(SimulatedModule::with_delay(delay)));
        }
        registry
    }

    /// 同名があれば実装を差し替える
    pub fn register(&mut self, name: impl Into<String>, module: Arc<dyn ModuleContract>) {
        let name = name.into();
        match self.modules.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = module,
            None => self.modules.push((name, module)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ModuleContract>> {
        self.modules
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, module)| Arc::clone(module))
    }

    pub fn resolve(&self, name: &str) -> BatchResult<Arc<dyn ModuleContract>> {
        self.get(name).ok_or_else(|| BatchError::unknown_module(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
