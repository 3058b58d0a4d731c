//! Majority-agreement check over a sentiment tally

use serde::Serialize;

use crate::models::signal::{SentimentSummary, SignalDirection};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Consensus {
    pub has_consensus: bool,
    /// Most frequent action; `None` for an empty tally or a tie at the top.
    pub direction: Option<SignalDirection>,
    /// Share of tallied entries holding `direction`.
    pub share: f64,
    pub count: usize,
}

/// Consensus holds when the leading action's share of the tally reaches
/// `threshold`.
pub fn analyze(summary: &SentimentSummary, threshold: f64) -> Consensus {
    let count = summary.total();
    if count == 0 {
        return Consensus {
            has_consensus: false,
            direction: None,
            share: 0.0,
            count,
        };
    }

    let ranked = [
        SignalDirection::Buy,
        SignalDirection::Sell,
        SignalDirection::Hold,
    ]
    .map(|direction| (direction, summary.count(direction)));
    let top = ranked.iter().map(|&(_, n)| n).max().unwrap_or(0);
    let mut leaders = ranked.iter().filter(|&&(_, n)| n == top);
    let direction = match (leaders.next(), leaders.next()) {
        (Some(&(direction, _)), None) => Some(direction),
        _ => None,
    };

    let share = top as f64 / count as f64;
    Consensus {
        has_consensus: direction.is_some() && share >= threshold,
        direction,
        share,
        count,
    }
}
