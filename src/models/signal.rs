use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::indicators::{IndicatorOutput, MarketData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
    Hold,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
            SignalDirection::Hold => "HOLD",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalDirection {
    type Err = String;

    /// Exact, case-sensitive match on the wire labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(SignalDirection::Buy),
            "SELL" => Ok(SignalDirection::Sell),
            "HOLD" => Ok(SignalDirection::Hold),
            other => Err(format!("unrecognized action: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub name: String,
    pub strength: f64,
    pub direction: Option<SignalDirection>,
}

fn default_action() -> String {
    SignalDirection::Hold.as_str().to_string()
}

/// Action submitted by a trading agent, together with the indicator it wants
/// evaluated on `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSignal {
    pub agent: String,
    /// Raw action label. Anything other than BUY/SELL/HOLD is carried through
    /// and left out of the tally.
    #[serde(default = "default_action")]
    pub action: String,
    pub indicator: String,
    pub data: MarketData,
}

impl AgentSignal {
    pub fn new(
        agent: impl Into<String>,
        action: impl Into<String>,
        indicator: impl Into<String>,
        data: MarketData,
    ) -> Self {
        Self {
            agent: agent.into(),
            action: action.into(),
            indicator: indicator.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedSignal {
    pub agent: String,
    pub action: String,
    pub indicator_signal: IndicatorOutput,
}

/// BUY/SELL/HOLD tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSummary {
    #[serde(rename = "BUY")]
    pub buy: usize,
    #[serde(rename = "SELL")]
    pub sell: usize,
    #[serde(rename = "HOLD")]
    pub hold: usize,
}

impl SentimentSummary {
    /// Count recognized labels; unrecognized ones are skipped.
    pub fn tally<'a>(actions: impl IntoIterator<Item = &'a str>) -> Self {
        let mut summary = Self::default();
        for action in actions {
            if let Ok(direction) = action.parse::<SignalDirection>() {
                summary.record(direction);
            }
        }
        summary
    }

    pub fn record(&mut self, direction: SignalDirection) {
        match direction {
            SignalDirection::Buy => self.buy += 1,
            SignalDirection::Sell => self.sell += 1,
            SignalDirection::Hold => self.hold += 1,
        }
    }

    pub fn count(&self, direction: SignalDirection) -> usize {
        match direction {
            SignalDirection::Buy => self.buy,
            SignalDirection::Sell => self.sell,
            SignalDirection::Hold => self.hold,
        }
    }

    pub fn total(&self) -> usize {
        self.buy + self.sell + self.hold
    }
}
