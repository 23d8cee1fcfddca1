use std::sync::Arc;

use crate::adapters::{ClipPlanConfig, FfprobeJsonAdapter, StaticCapabilities};
use crate::app::{inspect_interactor::InspectInteractor, plan_interactor::PlanInteractor};
use crate::planner::BitratePolicy;
use crate::ports::{CapabilityPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn plan_interactor(&self) -> Arc<PlanInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

pub struct DefaultAppContainer {
    plan_interactor: Arc<PlanInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        capability_port: Arc<dyn CapabilityPort>,
        policy: BitratePolicy,
    ) -> Self {
        let plan_interactor = Arc::new(PlanInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&capability_port),
            policy,
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&capability_port),
        ));

        Self {
            plan_interactor,
            inspect_interactor,
        }
    }

    /// Wire the ffprobe JSON adapter and the configured capabilities
    pub fn from_config(config: &ClipPlanConfig) -> Self {
        let probe_port = Arc::new(FfprobeJsonAdapter::new());
        let capability_port = Arc::new(StaticCapabilities::new(config.capabilities.clone()));

        Self::new(
            probe_port as Arc<dyn ProbePort>,
            capability_port as Arc<dyn CapabilityPort>,
            config.policy.clone(),
        )
    }
}

impl AppContainer for DefaultAppContainer {
    fn plan_interactor(&self) -> Arc<PlanInteractor> {
        Arc::clone(&self.plan_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
