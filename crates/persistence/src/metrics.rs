//! Query timing and pool gauges.

use std::time::Instant;

use metrics::{gauge, histogram};
use sqlx::PgPool;

/// Times a repository query and reports it as a labelled histogram sample.
///
/// Dropping the timer without calling [`record`](QueryTimer::record) reports
/// nothing, so error paths stay out of the latency series.
pub struct QueryTimer {
    name: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
        }
    }

    pub fn record(self) {
        histogram!(
            "database_query_duration_seconds",
            "query" => self.name,
        )
        .record(self.started.elapsed().as_secs_f64());
    }
}

/// Snapshot of pool occupancy, exported as gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let total = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_total").set(total as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_active").set(total.saturating_sub(idle) as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_keeps_its_name() {
        let timer = QueryTimer::new("find_affiliate_by_id");
        assert_eq!(timer.name, "find_affiliate_by_id");
    }
}
