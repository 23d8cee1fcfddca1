// Plan interactor - Orchestrates the plan-and-emit use case

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::options::Options;
use crate::domain::plan::EncodePlan;
use crate::emitter::{default_scratch_dir, CommandEmitter, EmitContext, EmittedCommands};
use crate::error::{ClipPlanError, ClipPlanResult};
use crate::planner::{BitratePolicy, EncodePlanBuilder};
use crate::ports::*;
use crate::utils::PathUtils;

/// Interactor for the plan use case
pub struct PlanInteractor {
    probe_port: Arc<dyn ProbePort>,
    capability_port: Arc<dyn CapabilityPort>,
    policy: BitratePolicy,
    paths: PathUtils,
    emitter: CommandEmitter,
}

impl PlanInteractor {
    /// Create new plan interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        capability_port: Arc<dyn CapabilityPort>,
        policy: BitratePolicy,
    ) -> Self {
        Self {
            probe_port,
            capability_port,
            policy,
            paths: PathUtils::new(),
            emitter: CommandEmitter::new(),
        }
    }

    pub fn policy(&self) -> &BitratePolicy {
        &self.policy
    }

    /// Probe, plan, then emit
    pub fn execute(&self, request: PlanRequest) -> ClipPlanResult<PlanResponse> {
        request.options.validate()?;

        info!("Planning clip for: {}", request.source);
        let metadata = self.probe_port.probe_media(&request.probe_path)?;

        let builder = EncodePlanBuilder::new(self.policy.clone(), self.capability_port.capabilities());
        let plan = builder.plan(&metadata, &request.options)?;
        for warning in &plan.warnings {
            warn!("{}", warning);
        }

        let output = match request.output {
            Some(output) => output,
            None => self
                .paths
                .derive_output_path(&request.source, request.options.container)
                .to_string_lossy()
                .to_string(),
        };
        if output == request.source {
            return Err(ClipPlanError::OutputError {
                message: format!("output would overwrite the source: {}", output),
            });
        }

        let scratch_dir = request.scratch_dir.unwrap_or_else(default_scratch_dir);
        let stats_id = format!("clipplan-{}", uuid::Uuid::new_v4().simple());
        let ctx = EmitContext::new(request.source, output.clone(), scratch_dir, stats_id);
        let commands = self.emitter.emit(&plan, &ctx);

        info!(
            "Emitted {} command(s) writing {}",
            commands.commands.len(),
            output
        );

        Ok(PlanResponse {
            output,
            plan,
            commands,
        })
    }
}

/// Request for the plan use case
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Saved ffprobe JSON describing the source
    pub probe_path: String,
    /// Media path placed in the emitted commands
    pub source: String,
    pub output: Option<String>,
    pub scratch_dir: Option<PathBuf>,
    pub options: Options,
}

impl PlanRequest {
    pub fn new(probe_path: impl Into<String>, source: impl Into<String>, options: Options) -> Self {
        Self {
            probe_path: probe_path.into(),
            source: source.into(),
            output: None,
            scratch_dir: None,
            options,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}

/// Plan plus its commands
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub output: String,
    pub plan: EncodePlan,
    pub commands: EmittedCommands,
}
