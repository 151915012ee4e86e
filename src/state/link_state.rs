use std::fmt;

/// Terminal states of a discovered link
///
/// Every link taken off a fetched page runs the pipeline
/// normalize → dedup → domain check → classify and ends in exactly one of
/// these states. Rejections are final: a rejected URL is never reconsidered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkOutcome {
    // ===== Rejections =====
    /// The href did not resolve to an http(s) URL with a host
    RejectedParse,

    /// The URL had already passed the dedup gate
    RejectedDuplicate,

    /// The host is not on the allow-list
    RejectedOutOfScope,

    // ===== Classified =====
    /// In scope, but neither relevant nor traversable
    Ignored,

    /// Recorded as a match; a static asset, so not fetched
    Recorded,

    /// Not a match; queued for fetching
    Enqueued,

    /// Recorded as a match and queued for fetching
    RecordedAndEnqueued,

    // ===== Shutdown =====
    /// The stop signal was raised before the link was looked at
    Cancelled,
}

impl LinkOutcome {
    /// Builds the outcome of a classified link
    pub fn classified(recorded: bool, enqueued: bool) -> Self {
        match (recorded, enqueued) {
            (true, true) => Self::RecordedAndEnqueued,
            (true, false) => Self::Recorded,
            (false, true) => Self::Enqueued,
            (false, false) => Self::Ignored,
        }
    }

    /// Returns true if the link was rejected before classification
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RejectedParse | Self::RejectedDuplicate | Self::RejectedOutOfScope
        )
    }

    /// Returns true if a match record was created for the link
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded | Self::RecordedAndEnqueued)
    }

    /// Returns true if the link was added to the frontier
    pub fn is_enqueued(&self) -> bool {
        matches!(self, Self::Enqueued | Self::RecordedAndEnqueued)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RejectedParse => "rejected_parse",
            Self::RejectedDuplicate => "rejected_duplicate",
            Self::RejectedOutOfScope => "rejected_out_of_scope",
            Self::Ignored => "ignored",
            Self::Recorded => "recorded",
            Self::Enqueued => "enqueued",
            Self::RecordedAndEnqueued => "recorded_and_enqueued",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns all possible outcomes
    pub fn all() -> [Self; 8] {
        [
            Self::RejectedParse,
            Self::RejectedDuplicate,
            Self::RejectedOutOfScope,
            Self::Ignored,
            Self::Recorded,
            Self::Enqueued,
            Self::RecordedAndEnqueued,
            Self::Cancelled,
        ]
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
