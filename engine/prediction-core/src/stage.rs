//! Stage resolution
//!
//! A playoff phase stays current until the day after its last scheduled
//! match; the first phase whose switch date is still ahead of `today` is the
//! active one. When no playoff phase qualifies the season falls back to the
//! regular round extracted from the source's current-round label.

use chrono::NaiveDate;
use tracing::warn;

use crate::types::{Match, PlayoffPhase, Stage};

/// Resolve the active playoff phase from the full playoff fixture list.
///
/// Phases are walked in bracket order, so two phases sharing a switch date
/// resolve to the earlier one. Returns `None` when every switch date has
/// passed or no playoff matches exist.
pub fn resolve_playoff_stage(playoff_matches: &[Match], today: NaiveDate) -> Option<PlayoffPhase> {
    for phase in PlayoffPhase::ALL {
        let latest_kickoff = playoff_matches
            .iter()
            .filter(|m| m.stage == Stage::Playoff(phase))
            .map(|m| m.kickoff.date_naive())
            .max();
        let Some(latest) = latest_kickoff else {
            continue;
        };
        // the phase stays current through the day of its last match
        let Some(switch_date) = latest.checked_add_signed(chrono::Duration::days(1)) else {
            continue;
        };
        if today < switch_date {
            return Some(phase);
        }
    }
    None
}

/// Extract the trailing round number from a current-round label
/// (e.g. "Regular Season - 12" → 12).
///
/// Falls back to round 1 when the label has no trailing integer; the
/// fallback is deliberate, not an error.
pub fn parse_round_label(label: &str) -> u32 {
    let trailing: String = label
        .trim()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    match trailing.parse::<u32>() {
        Ok(round) => round,
        Err(_) => {
            warn!(label, "current-round label has no trailing number, defaulting to round 1");
            1
        }
    }
}
