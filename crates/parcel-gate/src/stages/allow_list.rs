use std::collections::HashSet;

use parcel_types::SubmissionEvent;

use crate::config::GateConfig;
use crate::error::GateError;
use crate::stage::{GateContext, GateStage, StageDecision};

/// A normalized set of accepted submitters.
#[derive(Clone, Debug, Default)]
pub struct AllowList {
    entries: HashSet<String>,
    case_sensitive: bool,
}

impl AllowList {
    pub fn new<I, S>(submitters: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = submitters
            .into_iter()
            .map(|s| normalize(s.as_ref(), case_sensitive))
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            entries,
            case_sensitive,
        }
    }

    pub fn contains(&self, submitter: &str) -> bool {
        self.entries
            .contains(&normalize(submitter, self.case_sensitive))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(submitter: &str, case_sensitive: bool) -> String {
    let trimmed = submitter.trim();
    if case_sensitive {
        trimmed.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// Submitter allow-list stage.
///
/// An empty list rejects every event unless the gate is permissive.
pub struct AllowListStage {
    list: AllowList,
    permissive: bool,
}

impl AllowListStage {
    pub fn new(list: AllowList, permissive: bool) -> Self {
        Self { list, permissive }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            AllowList::new(&config.allowed_submitters, config.case_sensitive),
            config.permissive,
        )
    }
}

impl GateStage for AllowListStage {
    fn name(&self) -> &str {
        "allow_list"
    }

    fn evaluate(
        &self,
        event: &SubmissionEvent,
        _context: &GateContext,
    ) -> Result<StageDecision, GateError> {
        if self.permissive || self.list.contains(&event.submitter) {
            return Ok(StageDecision::Pass);
        }
        if self.list.is_empty() {
            return Ok(StageDecision::fail("allow-list is empty"));
        }
        Ok(StageDecision::fail(format!(
            "submitter {} is not allow-listed",
            event.submitter
        )))
    }
}
