use chrono::NaiveDate;
use log::{Level, debug, info, log};

use crate::error::IngestError;
use crate::rate_source::RateSource;
use crate::store::RateStore;

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The latest stored date is already today; nothing was fetched.
    AlreadyUpdated { date: NaiveDate },
    Completed(IngestSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestSummary {
    pub date: NaiveDate,
    pub success_count: usize,
    pub error_count: usize,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.success_count + self.error_count
    }

    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }

    /// The aggregate line followed by the success or error line.
    pub fn report_lines(&self) -> [(Level, String); 2] {
        let (ok, err) = (self.success_count, self.error_count);

        let totals = format!(
            "{} - processed {} rate{}: {} success{}, {} error{}",
            self.date,
            self.total(),
            plural(self.total(), "s"),
            ok,
            plural(ok, "es"),
            err,
            plural(err, "s"),
        );

        let outcome = if err == 0 {
            (
                Level::Info,
                format!(
                    "{} - all rates successfully updated ({ok} total)",
                    self.date
                ),
            )
        } else if ok == 0 {
            (
                Level::Error,
                format!(
                    "{} - {err} error{} during processing.",
                    self.date,
                    plural(err, "s")
                ),
            )
        } else {
            (
                Level::Error,
                format!(
                    "{} - {ok} rate{} updated, {err} error{} during processing.",
                    self.date,
                    plural(ok, "s"),
                    plural(err, "s")
                ),
            )
        };

        [(Level::Info, totals), outcome]
    }

    pub fn log(&self) {
        for (level, line) in self.report_lines() {
            log!(level, "{line}");
        }
    }
}

fn plural(count: usize, suffix: &str) -> &str {
    if count == 1 { "" } else { suffix }
}

/// Freshness guard, fetch and per-row insert. Does not close `store`.
pub async fn ingest<S>(
    store: &mut S,
    source: &RateSource,
    base: &str,
    today: NaiveDate,
) -> Result<IngestOutcome, IngestError>
where
    S: RateStore + ?Sized,
{
    let latest_stored = store.max_date().await.map_err(IngestError::Storage)?;
    if latest_stored == Some(today) {
        info!("{today} - rates already updated today, nothing to do");
        return Ok(IngestOutcome::AlreadyUpdated { date: today });
    }

    let latest = source.fetch_rates(base).await?;
    let date = latest.last_update_date()?;
    let rates = latest.into_rates()?;
    info!("{date} - fetched {} rates for base {base}", rates.len());

    let mut summary = IngestSummary {
        date,
        success_count: 0,
        error_count: 0,
    };

    for rate in &rates {
        match store.insert_rate(rate).await {
            Ok(()) => summary.success_count += 1,
            Err(e) if e.is_duplicate() => {
                summary.error_count += 1;
                debug!("Error for {}: {e}", rate.currency);
            }
            Err(e) => return Err(IngestError::Storage(e)),
        }
    }

    Ok(IngestOutcome::Completed(summary))
}

/// Runs [`ingest`] and closes `store` on every exit path.
pub async fn run_job<S>(
    store: &mut S,
    source: &RateSource,
    base: &str,
    today: NaiveDate,
) -> Result<IngestOutcome, IngestError>
where
    S: RateStore + ?Sized,
{
    let result = ingest(store, source, base, today).await;
    store.close().await;

    if let Ok(IngestOutcome::Completed(summary)) = &result {
        summary.log();
    }

    result
}
