// Ports - Interface definitions (contracts)

use crate::domain::model::*;
use crate::error::ProbeError;

/// Port for media metadata
pub trait ProbePort: Send + Sync {
    /// Describe the media at `locator`; failure is final, there is no fallback probe
    fn probe_media(&self, locator: &str) -> Result<SourceMetadata, ProbeError>;
}

/// Port for engine capabilities, injected rather than discovered by the planner
pub trait CapabilityPort: Send + Sync {
    fn capabilities(&self) -> EngineCapabilities;

    fn has_encoder(&self, encoder: Encoder) -> bool {
        self.capabilities().supports(encoder)
    }
}
