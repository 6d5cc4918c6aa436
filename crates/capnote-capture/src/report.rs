//! Per-message capture results.

use uuid::Uuid;

/// Pipeline stages in the order a message passes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Received,
    Logged,
    Admitted,
    UrlsExtracted,
    Composed,
    Submitted,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Logged => "logged",
            Self::Admitted => "admitted",
            Self::UrlsExtracted => "urls_extracted",
            Self::Composed => "composed",
            Self::Submitted => "submitted",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Internal,
    External,
    Text,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Text => "text",
        }
    }
}

/// What happened to one composed (or skipped) note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    Saved {
        title: String,
        note_id: Option<String>,
        failed_tags: Vec<String>,
    },
    Failed {
        title: String,
        error: String,
    },
    /// No draft was built, e.g. article extraction came back empty.
    Skipped {
        url: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub capture_id: Uuid,
    /// Furthest stage reached. Messages outside the capture scope stop at
    /// [`Stage::Logged`].
    pub stage: Stage,
    pub admitted: bool,
    /// Row id in the local message log, if logging succeeded.
    pub message_id: Option<i64>,
    pub memo_id: Option<i64>,
    /// One entry per URL in message order, or a single [`Branch::Text`].
    pub branches: Vec<Branch>,
    pub notes: Vec<NoteOutcome>,
}

impl CaptureReport {
    pub fn new(capture_id: Uuid) -> Self {
        Self {
            capture_id,
            stage: Stage::Received,
            admitted: false,
            message_id: None,
            memo_id: None,
            branches: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub(crate) fn reach(&mut self, stage: Stage) {
        self.stage = self.stage.max(stage);
    }

    pub fn saved(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| matches!(n, NoteOutcome::Saved { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| matches!(n, NoteOutcome::Failed { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_only_moves_forward() {
        let mut report = CaptureReport::new(Uuid::now_v7());
        report.reach(Stage::Submitted);
        report.reach(Stage::Composed);
        assert_eq!(report.stage, Stage::Submitted);
    }

    #[test]
    fn test_outcome_counts() {
        let mut report = CaptureReport::new(Uuid::now_v7());
        report.notes.push(NoteOutcome::Saved {
            title: "a".into(),
            note_id: None,
            failed_tags: vec![],
        });
        report.notes.push(NoteOutcome::Failed {
            title: "b".into(),
            error: "boom".into(),
        });
        report.notes.push(NoteOutcome::Skipped {
            url: "https://x".into(),
            reason: "no content".into(),
        });
        assert_eq!((report.saved(), report.failed()), (1, 1));
    }
}
