//! Coarse pipeline status derived from per-node runtime state. Node state
//! transitions are owned by the external connector/topic service; this
//! module only folds the current snapshot into a single label for the
//! pipeline list page.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::properties::Pipeline;

/// How many objects must report RUNNING before the pipeline as a whole is
/// labeled running. The default of 2 encodes the heuristic that a minimally
/// useful pipeline needs at least a live source and a live sink; a single
/// running node still reads as stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPolicy {
    pub min_running: usize,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        StatusPolicy { min_running: 2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    Running,
    Stopped,
}

impl Display for PipelineStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStatus::Running => write!(f, "Running"),
            PipelineStatus::Stopped => write!(f, "Stopped"),
        }
    }
}

pub fn derive_status(pipeline: &Pipeline, policy: &StatusPolicy) -> PipelineStatus {
    status_report(pipeline, policy).status
}

/// Status annotation for the pipeline overview page: the derived label plus
/// the counts it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: PipelineStatus,
    pub running: usize,
    pub total: usize,
}

pub fn status_report(pipeline: &Pipeline, policy: &StatusPolicy) -> StatusReport {
    let running = pipeline
        .objects
        .iter()
        .filter(|object| object.state.is_running())
        .count();
    let status = if running >= policy.min_running {
        PipelineStatus::Running
    } else {
        PipelineStatus::Stopped
    };
    StatusReport {
        status,
        running,
        total: pipeline.objects.len(),
    }
}
