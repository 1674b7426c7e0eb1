//! Startup Demo
//!
//! Calls the cached greeter a few times and logs how long each call took,
//! showing the slow first miss followed by fast hits.

use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::error::Result;
use crate::greeter::CachedGreeter;

/// Outcome of one measured call.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub result: String,
    pub elapsed: Duration,
}

/// Greets `name` `rounds` times through the cache, timing each call.
pub async fn run_timing_demo(
    greeter: &CachedGreeter,
    name: &str,
    rounds: usize,
) -> Result<Vec<Measurement>> {
    let mut measurements = Vec::with_capacity(rounds);

    for _ in 0..rounds {
        let start = Instant::now();
        let result = greeter.greet(name).await?;
        let elapsed = start.elapsed();

        info!("possibly cached result: {}", result);
        info!("delta: {}ms", elapsed.as_millis());

        measurements.push(Measurement { result, elapsed });
    }

    Ok(measurements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::greeter::SlowGreeter;

    #[tokio::test(start_paused = true)]
    async fn test_first_round_is_slow_rest_are_cached() {
        let greeter = CachedGreeter::new(
            SlowGreeter::new(Duration::from_secs(10)),
            CacheConfig::new("slow-greet"),
        );

        let measurements = run_timing_demo(&greeter, "World", 3).await.unwrap();

        assert_eq!(measurements.len(), 3);
        assert!(measurements[0].elapsed >= Duration::from_secs(10));
        for later in &measurements[1..] {
            assert_eq!(later.result, measurements[0].result);
            assert!(later.elapsed < Duration::from_secs(1));
        }
        assert_eq!(greeter.greeter().invocations(), 1);
    }

    #[tokio::test]
    async fn test_zero_rounds() {
        let greeter = CachedGreeter::new(SlowGreeter::new(Duration::ZERO), CacheConfig::default());
        let measurements = run_timing_demo(&greeter, "World", 0).await.unwrap();
        assert!(measurements.is_empty());
    }
}
