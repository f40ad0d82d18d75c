use std::fmt;

/// Stages of an analysis, in the order a full ensemble comparison passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Neighbor graphs and displacement tensors of single structures.
    LocalEnvironments,
    /// Mean distances and the shared neighbor graph of an ensemble.
    ConsensusNeighborhoods,
    /// Per-residue superposition and averaging of ensemble members.
    ConsensusAlignment,
    /// Per-residue metric evaluation.
    Scoring,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::LocalEnvironments => "Local Environments",
            Phase::ConsensusNeighborhoods => "Consensus Neighborhoods",
            Phase::ConsensusAlignment => "Consensus Alignment",
            Phase::Scoring => "Scoring Deformation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { phase: Phase },
    PhaseFinish,

    /// One step per residue.
    TaskStart { total_residues: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback; without one, events are dropped.
///
/// Increments may arrive from several worker threads at once.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `work` between `PhaseStart` and `PhaseFinish` events.
    ///
    /// `PhaseFinish` is sent even when `work` returns an error.
    pub fn phase<T>(&self, phase: Phase, work: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { phase });
        let out = work();
        self.report(Progress::PhaseFinish);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        let value = reporter.phase(Phase::Scoring, || 7);
        reporter.report(Progress::TaskIncrement);
        assert_eq!(value, 7);
    }

    #[test]
    fn phase_brackets_work_with_start_and_finish() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(format!("{:?}", event));
        }));
        let result: Result<(), &str> = reporter.phase(Phase::ConsensusAlignment, || {
            reporter.report(Progress::Message("aligning".to_string()));
            Err("failed")
        });
        drop(reporter);

        assert!(result.is_err());
        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[0].contains("ConsensusAlignment"));
        assert!(events[1].contains("aligning"));
        assert_eq!(events[2], "PhaseFinish");
    }

    #[test]
    fn phase_names_are_human_readable() {
        assert_eq!(Phase::Scoring.to_string(), "Scoring Deformation");
        assert_eq!(Phase::LocalEnvironments.name(), "Local Environments");
    }
}
