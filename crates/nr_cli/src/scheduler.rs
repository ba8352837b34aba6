use std::sync::Arc;

use chrono::Utc;
use cron::Schedule;
use tracing::{info, warn};

use nr_pipeline::Commander;

/// Run the pipeline on a cron schedule, forever.
///
/// Each fire runs the commander for the configured topic; failures are
/// logged and the loop keeps going.
pub async fn run_scheduler(commander: Arc<Commander>, schedule: Schedule, topic: String) {
    info!(%topic, "⏰ scheduler started");

    loop {
        let Some(next) = schedule.upcoming(Utc).next() else {
            warn!("schedule has no upcoming fire times; scheduler stopping");
            return;
        };
        info!(next = %next, "next scheduled run");

        let wait = match (next - Utc::now()).to_std() {
            Ok(wait) => wait,
            Err(_) => continue, // fire time already passed
        };
        tokio::time::sleep(wait).await;

        info!(%topic, "⏰ scheduled pipeline run triggered");
        match commander.run(&topic).await {
            Ok(result) => {
                info!(status = ?result.status, stored = result.stored, "scheduled run finished")
            }
            Err(e) => warn!(error = %e, "scheduled run failed"),
        }
    }
}
