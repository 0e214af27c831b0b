use std::path::Path;

use crate::types::PlaygroundConfig;

impl PlaygroundConfig {
    /// Anchor relative paths at `base`, normally the directory holding the config file.
    /// Absolute paths are left alone.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.server.public_dir.is_relative() {
            self.server.public_dir = base.join(&self.server.public_dir);
        }
        if self.agents.source.is_relative() {
            self.agents.source = base.join(&self.agents.source);
        }
    }

    /// Returns a copy with relative paths anchored at `base` and overrides deduplicated
    /// by trimmed agent id (last one wins).
    pub fn effective(&self, base: &Path) -> PlaygroundConfig {
        let mut config = self.clone();
        config.resolve_paths(base);

        let overrides = std::mem::take(&mut config.analysis.latency_overrides);
        for (id, latency) in overrides {
            config
                .analysis
                .latency_overrides
                .insert(id.trim().to_string(), latency);
        }
        config
    }
}
