//! Per-request pipeline stages.

use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;

/// States a push moves through, in order.
///
/// Failures branch off from whichever of `Received`, `Decoded`, `Validated` or
/// `Classified` was last reached, then rejoin at `Published`. Every path ends
/// at `Acknowledged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIterMacro)]
pub enum Stage {
    /// Push body read
    Received,
    /// Envelope parsed and payload decoded
    Decoded,
    /// URL passed validation
    Validated,
    /// Response captured
    Fetched,
    /// Body classified and outcome built
    Classified,
    /// Outcome handed to the publisher
    Published,
    /// 200 returned to the subscription
    Acknowledged,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Stage {
    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<Stage> {
        Stage::iter().skip_while(|stage| *stage != self).nth(1)
    }

    /// Lower-case stage name for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Decoded => "decoded",
            Stage::Validated => "validated",
            Stage::Fetched => "fetched",
            Stage::Classified => "classified",
            Stage::Published => "published",
            Stage::Acknowledged => "acknowledged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_are_ordered() {
        let stages: Vec<Stage> = Stage::iter().collect();
        let mut sorted = stages.clone();
        sorted.sort();
        assert_eq!(stages, sorted);
        assert_eq!(stages.first(), Some(&Stage::Received));
        assert_eq!(stages.last(), Some(&Stage::Acknowledged));
    }

    #[test]
    fn test_stage_next() {
        assert_eq!(Stage::Received.next(), Some(Stage::Decoded));
        assert_eq!(Stage::Validated.next(), Some(Stage::Fetched));
        assert_eq!(Stage::Published.next(), Some(Stage::Acknowledged));
        assert_eq!(Stage::Acknowledged.next(), None);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Validated.to_string(), "validated");
        for stage in Stage::iter() {
            assert!(!stage.as_str().is_empty());
        }
    }
}
