use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_tokens: u64,
    pub last_request_time: Option<DateTime<Utc>>,
}

impl RequestStats {
    pub(crate) fn record_attempt(&mut self) {
        self.total_requests += 1;
        self.last_request_time = Some(Utc::now());
    }

    pub(crate) fn record_success(&mut self, tokens: u64) {
        self.successful_requests += 1;
        self.total_tokens += tokens;
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed_requests += 1;
    }

    pub fn view(&self, conversation_length: usize) -> StatsView {
        StatsView {
            stats: self.clone(),
            conversation_length,
            average_tokens: self.average_tokens(),
            success_rate: self.success_rate(),
        }
    }

    fn average_tokens(&self) -> u64 {
        if self.total_requests == 0 {
            return 0;
        }
        (self.total_tokens as f64 / self.total_requests as f64).round() as u64
    }

    fn success_rate(&self) -> u64 {
        if self.total_requests == 0 {
            return 0;
        }
        (100.0 * self.successful_requests as f64 / self.total_requests as f64).round() as u64
    }
}

/// Counters plus the derived metrics, recomputed on every call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    #[serde(flatten)]
    pub stats: RequestStats,
    pub conversation_length: usize,
    pub average_tokens: u64,
    pub success_rate: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_derive_zero() {
        let view = RequestStats::default().view(0);
        assert_eq!(view.average_tokens, 0);
        assert_eq!(view.success_rate, 0);
        assert!(view.stats.last_request_time.is_none());
    }

    #[test]
    fn derived_metrics_round() {
        let mut stats = RequestStats::default();
        for _ in 0..3 {
            stats.record_attempt();
        }
        stats.record_success(10);
        stats.record_success(10);
        stats.record_failure();

        let view = stats.view(4);
        assert_eq!(view.success_rate, 67);
        assert_eq!(view.average_tokens, 7);
        assert_eq!(view.conversation_length, 4);
        assert_eq!(
            stats.total_requests,
            stats.successful_requests + stats.failed_requests
        );
    }
}
