//! Status module - the document lifecycle state machine
//!
//! A document is created at `processing` and settles at `done` or `failed`
//! within a single ingestion attempt. A failed document may re-enter
//! `processing` for another attempt. `uploaded` and `queued` are valid
//! persisted values with no transition leading into them.

use std::fmt;

/// Lifecycle status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    /// Bytes stored, no processing started
    Uploaded,

    /// Waiting for an asynchronous worker (no worker exists yet)
    Queued,

    /// Extraction in progress
    Processing,

    /// Extraction completed and metadata attached
    Done,

    /// Extraction failed; the reason is on the document
    Failed,
}

/// Every status value, in declaration order
pub const ALL_STATUSES: [DocumentStatus; 5] = [
    DocumentStatus::Uploaded,
    DocumentStatus::Queued,
    DocumentStatus::Processing,
    DocumentStatus::Done,
    DocumentStatus::Failed,
];

impl DocumentStatus {
    /// Get the persisted name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Uploaded => "uploaded",
            DocumentStatus::Queued => "queued",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Done => "done",
            DocumentStatus::Failed => "failed",
        }
    }

    /// Parse a status from its persisted name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploaded" => Some(DocumentStatus::Uploaded),
            "queued" => Some(DocumentStatus::Queued),
            "processing" => Some(DocumentStatus::Processing),
            "done" => Some(DocumentStatus::Done),
            "failed" => Some(DocumentStatus::Failed),
            _ => None,
        }
    }

    /// Whether the transition `from -> to` is in the transition table
    ///
    /// `from = None` stands for a document that does not exist yet.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdx_domain::DocumentStatus::*;
    /// use mdx_domain::DocumentStatus;
    ///
    /// assert!(DocumentStatus::can_transition(None, Processing));
    /// assert!(DocumentStatus::can_transition(Some(Processing), Done));
    /// assert!(!DocumentStatus::can_transition(Some(Done), Failed));
    /// ```
    pub fn can_transition(from: Option<DocumentStatus>, to: DocumentStatus) -> bool {
        use DocumentStatus::*;

        matches!(
            (from, to),
            (None, Processing)
                | (Some(Processing), Done)
                | (Some(Processing), Failed)
                | (Some(Failed), Processing)
        )
    }

    /// Validate a transition, returning a descriptive error when rejected
    pub fn check_transition(
        from: Option<DocumentStatus>,
        to: DocumentStatus,
    ) -> Result<(), TransitionError> {
        if Self::can_transition(from, to) {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid document status: {}", s))
    }
}

/// A status change outside the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    /// Current status (`None` when the document does not exist)
    pub from: Option<DocumentStatus>,

    /// Requested status
    pub to: DocumentStatus,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "invalid status transition: {} -> {}", from, self.to),
            None => write!(f, "invalid status transition: (new) -> {}", self.to),
        }
    }
}

impl std::error::Error for TransitionError {}

#[cfg(test)]
mod tests {
    use super::DocumentStatus::*;
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in ALL_STATUSES {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("DONE"), None);
        assert!("archived".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn test_transition_table_is_closed() {
        let allowed = [
            (None, Processing),
            (Some(Processing), Done),
            (Some(Processing), Failed),
            (Some(Failed), Processing),
        ];

        let froms = std::iter::once(None).chain(ALL_STATUSES.iter().copied().map(Some));
        for from in froms {
            for to in ALL_STATUSES {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    DocumentStatus::can_transition(from, to),
                    expected,
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_queued_is_unreachable() {
        let froms = std::iter::once(None).chain(ALL_STATUSES.iter().copied().map(Some));
        for from in froms {
            assert!(!DocumentStatus::can_transition(from, Queued));
            assert!(!DocumentStatus::can_transition(from, Uploaded));
        }
    }

    #[test]
    fn test_check_transition_error_message() {
        let err = DocumentStatus::check_transition(Some(Done), Failed).unwrap_err();
        assert_eq!(err.to_string(), "invalid status transition: done -> failed");

        let err = DocumentStatus::check_transition(None, Done).unwrap_err();
        assert_eq!(err.from, None);
    }
}
