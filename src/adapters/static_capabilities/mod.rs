// Static capabilities adapter - engine features declared by configuration

use tracing::debug;

use crate::domain::model::{Encoder, EngineCapabilities};
use crate::ports::CapabilityPort;

/// Capabilities taken as given; nothing is probed on the host
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    capabilities: EngineCapabilities,
}

impl StaticCapabilities {
    pub fn new(capabilities: EngineCapabilities) -> Self {
        debug!(
            "Engine capabilities: hardware={:?} libplacebo={}",
            capabilities.hardware_encoders, capabilities.libplacebo
        );
        Self { capabilities }
    }

    /// Build from a comma separated encoder list such as `h264-nvenc,hevc-nvenc`
    pub fn from_list(list: &str, libplacebo: bool) -> Result<Self, String> {
        let mut hardware_encoders = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let encoder: Encoder = name.parse().map_err(|e| format!("{}", e))?;
            if !encoder.is_hardware() {
                return Err(format!("{} is not a hardware encoder", encoder));
            }
            if !hardware_encoders.contains(&encoder) {
                hardware_encoders.push(encoder);
            }
        }
        Ok(Self::new(EngineCapabilities {
            hardware_encoders,
            libplacebo,
        }))
    }
}

impl CapabilityPort for StaticCapabilities {
    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list() {
        let caps = StaticCapabilities::from_list("h264-nvenc, hevc_nvenc,h264-nvenc", false).unwrap();
        assert_eq!(
            caps.capabilities().hardware_encoders,
            vec![Encoder::H264Nvenc, Encoder::HevcNvenc]
        );
        assert!(caps.has_encoder(Encoder::HevcNvenc));
        assert!(caps.has_encoder(Encoder::X264));
    }

    #[test]
    fn test_from_list_rejects_software() {
        assert!(StaticCapabilities::from_list("x264", false).is_err());
        assert!(StaticCapabilities::from_list("", true).unwrap().capabilities().libplacebo);
    }
}
