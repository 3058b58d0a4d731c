//! Agent-signal aggregation and sentiment tally

use tracing::{debug, warn};

use crate::config::IndicatorConfig;
use crate::indicators::{IndicatorError, IndicatorRegistry};
use crate::models::signal::{AgentSignal, AggregatedSignal, SentimentSummary};

/// Runs each agent's chosen indicator and pairs the output with the agent's
/// action.
pub struct SignalAggregator {
    registry: IndicatorRegistry,
}

impl SignalAggregator {
    pub fn new(registry: IndicatorRegistry) -> Self {
        Self { registry }
    }

    /// Aggregator over the built-in indicators.
    pub fn with_defaults(config: &IndicatorConfig) -> Result<Self, IndicatorError> {
        Ok(Self::new(IndicatorRegistry::with_defaults(config)?))
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut IndicatorRegistry {
        &mut self.registry
    }

    /// One [`AggregatedSignal`] per input, in input order.
    ///
    /// Every indicator name is resolved before any indicator runs: an unknown
    /// name fails the whole batch with [`IndicatorError::NotFound`] and leaves
    /// all indicator state untouched. An indicator error part-way through also
    /// fails the batch; no partial list is returned.
    pub fn aggregate_signals(
        &mut self,
        agent_signals: &[AgentSignal],
    ) -> Result<Vec<AggregatedSignal>, IndicatorError> {
        if let Some(unknown) = agent_signals
            .iter()
            .find(|signal| !self.registry.contains(&signal.indicator))
        {
            warn!(
                agent = %unknown.agent,
                indicator = %unknown.indicator,
                "Rejected signal batch with unknown indicator"
            );
            return Err(IndicatorError::NotFound(unknown.indicator.clone()));
        }

        let aggregated = agent_signals
            .iter()
            .map(|signal| {
                let indicator_signal = self.registry.calculate(&signal.indicator, &signal.data)?;
                Ok(AggregatedSignal {
                    agent: signal.agent.clone(),
                    action: signal.action.clone(),
                    indicator_signal,
                })
            })
            .collect::<Result<Vec<_>, IndicatorError>>()?;

        debug!(count = aggregated.len(), "Aggregated agent signals");
        Ok(aggregated)
    }

    /// Count BUY/SELL/HOLD actions. Other actions are ignored.
    pub fn summarize_signals(aggregated_signals: &[AggregatedSignal]) -> SentimentSummary {
        SentimentSummary::tally(aggregated_signals.iter().map(|s| s.action.as_str()))
    }
}
