use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, warn};

use crate::jobs::JobError;

const FAILURE_BACKOFF: Duration = Duration::from_secs(30);

pub async fn run_interval<F, Fut>(
    name: &'static str,
    period: Duration,
    mut job: F,
) -> Result<(), JobError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), JobError>>,
{
    if period.is_zero() {
        return Err(JobError::InvalidInterval(name));
    }
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(job = name, period_secs = period.as_secs(), "job scheduled");
    loop {
        ticker.tick().await;
        if let Err(err) = job().await {
            warn!(error = %err, job = name, "job execution failed");
            sleep(FAILURE_BACKOFF).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::run_interval;
    use crate::jobs::JobError;

    #[tokio::test]
    async fn zero_period_is_rejected() {
        let result = run_interval("noop", Duration::ZERO, || async { Ok(()) }).await;
        assert!(matches!(result, Err(JobError::InvalidInterval("noop"))));
    }
}
