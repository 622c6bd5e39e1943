//! `autopost run`.

use autopost_core::Schedule;
use autopost_pipeline::{is_due, Services};
use chrono::Utc;

/// Run the pipeline once and print the result as JSON.
///
/// # Errors
///
/// Returns an error if the run cannot start (no store URL) or the rows
/// cannot be fetched. Row failures are part of the printed result.
pub(crate) async fn run_once(services: Services, max_posts: Option<u64>) -> anyhow::Result<()> {
    let services = match max_posts {
        Some(cap) => services.with_max_posts_per_run(Some(usize::try_from(cap)?)),
        None => services,
    };

    let result = services.run(Utc::now()).await?;
    let body = serde_json::json!({
        "success": true,
        "summary": result.summary,
        "results": result.results,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);

    if result.summary.failed > 0 {
        tracing::warn!(failed = result.summary.failed, "some rows failed");
    }
    Ok(())
}

/// Fetch the snapshot and print each row with whether it is due now.
///
/// # Errors
///
/// Same as [`run_once`] before the first row.
pub(crate) async fn run_dry(services: &Services) -> anyhow::Result<()> {
    let now = Utc::now();
    let rows = services.fetch_rows().await?;

    let listing: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "rowIndex": row.row_index,
                "due": is_due(row, now),
                "postTime": describe_schedule(&row.schedule),
                "images": row.images.len(),
                "status": row.status,
            })
        })
        .collect();

    let due = listing
        .iter()
        .filter(|r| r["due"].as_bool() == Some(true))
        .count();
    tracing::info!(total = rows.len(), due, "dry run: nothing was posted");
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

fn describe_schedule(schedule: &Schedule) -> Option<String> {
    match schedule {
        Schedule::Immediate => None,
        Schedule::At(at) => Some(at.to_rfc3339()),
        Schedule::Unparsable(raw) => Some(raw.clone()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn immediate_schedule_has_no_time() {
        assert_eq!(describe_schedule(&Schedule::Immediate), None);
    }

    #[test]
    fn scheduled_time_is_rfc3339() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        assert_eq!(
            describe_schedule(&Schedule::At(at)).as_deref(),
            Some("2024-06-01T09:30:00+00:00")
        );
    }

    #[test]
    fn unparsable_time_is_echoed() {
        assert_eq!(
            describe_schedule(&Schedule::Unparsable("soon".to_owned())).as_deref(),
            Some("soon")
        );
    }
}
