use std::time::{Duration, Instant};

use parcel_types::SubmissionEvent;
use tracing::{debug, info};

use crate::config::GateConfig;
use crate::error::GateError;
use crate::stage::{GateContext, GateStage, StageDecision, StageResult};
use crate::stages::{AllowListStage, ValidationStage};

// ---------------------------------------------------------------------------
// GateDecision / GateResult
// ---------------------------------------------------------------------------

/// Final verdict on an inbound event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Accepted,
    Rejected { stage: String, reason: String },
}

/// The outcome of running an event through the full gate pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub decision: GateDecision,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    /// Total wall-clock time for the pipeline evaluation.
    pub elapsed: Duration,
}

impl GateResult {
    /// Returns `true` if the event was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self.decision, GateDecision::Accepted)
    }
}

// ---------------------------------------------------------------------------
// EventGate
// ---------------------------------------------------------------------------

/// A fail-fast pipeline of stages every event passes before any network
/// resolution or store write happens.
pub struct EventGate {
    stages: Vec<Box<dyn GateStage>>,
    config: GateConfig,
}

impl EventGate {
    /// Create a gate with an empty pipeline.
    pub fn new(config: GateConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Create a gate with the default pipeline: validation -> allow_list
    pub fn with_default_stages(config: GateConfig) -> Self {
        let allow_list = AllowListStage::from_config(&config);
        let mut gate = Self::new(config);
        gate.add_stage(Box::new(ValidationStage));
        gate.add_stage(Box::new(allow_list));
        gate
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate an event through the pipeline.
    ///
    /// The first failing stage stops evaluation and produces a `Rejected`
    /// decision naming that stage.
    pub fn evaluate(&self, event: &SubmissionEvent) -> Result<GateResult, GateError> {
        let pipeline_start = Instant::now();
        let mut context = GateContext::default();
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(event, &context)?;
            let elapsed = stage_start.elapsed();

            let reason = match &decision {
                StageDecision::Pass => None,
                StageDecision::Fail { reason } => Some(reason.clone()),
            };
            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: reason.is_none(),
                reason,
                elapsed,
            };
            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Fail { reason } = decision {
                info!(
                    stage = stage.name(),
                    submitter = %event.submitter,
                    content_hash = %event.content_hash,
                    %reason,
                    "event rejected by gate"
                );
                return Ok(GateResult {
                    decision: GateDecision::Rejected {
                        stage: stage.name().to_string(),
                        reason,
                    },
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        debug!(submitter = %event.submitter, "event accepted by gate");
        Ok(GateResult {
            decision: GateDecision::Accepted,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}
