use parcel_types::SubmissionEvent;

use crate::error::GateError;
use crate::stage::{GateContext, GateStage, StageDecision};

/// Structural validation stage.
///
/// Checks that the submitter and property hash are populated. The content
/// hash is left to the CID codec, which reports a blank or malformed hash
/// as malformed input rather than a rejection.
pub struct ValidationStage;

impl GateStage for ValidationStage {
    fn name(&self) -> &str {
        "validation"
    }

    fn evaluate(
        &self,
        event: &SubmissionEvent,
        _context: &GateContext,
    ) -> Result<StageDecision, GateError> {
        let required = [
            ("submitter", &event.submitter),
            ("propertyHash", &event.property_hash),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Ok(StageDecision::fail(format!("{field} must not be empty")));
            }
        }
        Ok(StageDecision::Pass)
    }
}
