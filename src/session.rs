//! Operator arming commands and the forcing session they create.

use crate::error::ArmError;

/// Operator input: the word to force and how to force it.
///
/// Presence of `reveal_after_stops` selects the countdown reveal; otherwise
/// the word is spelled letter by letter at `rank` (default 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ArmCommand {
    pub target_word: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rank: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reveal_after_stops: Option<u32>,
}

impl ArmCommand {
    pub fn letters(target_word: impl Into<String>, rank: u32) -> Self {
        Self {
            target_word: target_word.into(),
            rank: Some(rank),
            reveal_after_stops: None,
        }
    }

    pub fn countdown(target_word: impl Into<String>, stops: u32) -> Self {
        Self {
            target_word: target_word.into(),
            rank: None,
            reveal_after_stops: Some(stops),
        }
    }

    /// Validate and build the session. Nothing is mutated on error.
    pub fn into_session(self) -> Result<ForcingSession, ArmError> {
        let target = self.target_word.trim().to_uppercase();
        if target.is_empty() {
            return Err(ArmError::EmptyTarget);
        }
        let mode = match (self.reveal_after_stops, self.rank) {
            (Some(stops), _) => SessionMode::CountdownReveal {
                stops_remaining: stops.max(1),
            },
            (None, Some(0)) => return Err(ArmError::InvalidRank(0)),
            (None, rank) => SessionMode::LetterByLetter {
                rank: rank.unwrap_or(1) as usize,
                cursor: 0,
            },
        };
        Ok(ForcingSession {
            letters: target.chars().collect(),
            target,
            mode,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Each stop lands on a word whose `rank`-th character is the next
    /// letter of the target.
    LetterByLetter { rank: usize, cursor: usize },
    /// The target itself appears verbatim on the last of these stops.
    CountdownReveal { stops_remaining: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcingSession {
    target: String,
    letters: Vec<char>,
    pub(crate) mode: SessionMode,
}

impl ForcingSession {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Letter to land next and the rank it must sit at.
    pub fn pending_letter(&self) -> Option<(char, usize)> {
        match self.mode {
            SessionMode::LetterByLetter { rank, cursor } => {
                self.letters.get(cursor).map(|letter| (*letter, rank))
            }
            SessionMode::CountdownReveal { .. } => None,
        }
    }
}

/// Lifecycle of the (single) forcing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Armed(ForcingSession),
    Completed,
}

impl SessionState {
    pub fn is_armed(&self) -> bool {
        matches!(self, SessionState::Armed(_))
    }

    pub fn session(&self) -> Option<&ForcingSession> {
        match self {
            SessionState::Armed(session) => Some(session),
            _ => None,
        }
    }

    /// Short human-readable status for the operator UI.
    pub fn describe(&self) -> String {
        match self {
            SessionState::Idle => "idle".to_string(),
            SessionState::Completed => "completed".to_string(),
            SessionState::Armed(session) => match session.mode {
                SessionMode::LetterByLetter { rank, cursor } => {
                    format!("letters {}/{} rank {}", cursor, session.len(), rank)
                }
                SessionMode::CountdownReveal { stops_remaining } => {
                    format!("countdown {stops_remaining}")
                }
            },
        }
    }
}
