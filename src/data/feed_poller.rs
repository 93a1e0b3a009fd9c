use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use tokio::sync::watch;

use crate::data::provider::QuoteProvider;
use crate::data::quote_feed::{FeedError, QuoteBatch, QuoteRequest};

#[cfg(debug_assertions)]
use crate::config::DF;

/// What the worker reports back for each request.
#[derive(Debug)]
pub enum FeedEvent {
    Batch { symbol: String, batch: QuoteBatch },
    Failed(FeedError),
    Cancelled,
}

struct FetchJob {
    request: QuoteRequest,
    // cancel() bumps the shared generation; any job issued before the bump is abandoned
    generation: u64,
}

/// Runs quote fetches on a dedicated thread so the frame loop never blocks on the network.
///
/// Each fetch is bounded by `timeout` and can be abandoned with [`FeedPoller::cancel`].
/// Results come back as [`FeedEvent`]s, drained with [`FeedPoller::try_next_event`].
pub struct FeedPoller {
    job_tx: Option<Sender<FetchJob>>,
    event_rx: Receiver<FeedEvent>,
    cancel_tx: watch::Sender<u64>,
}

impl FeedPoller {
    pub fn spawn(provider: Arc<dyn QuoteProvider>, timeout: Duration) -> anyhow::Result<Self> {
        let (job_tx, job_rx) = channel::<FetchJob>();
        let (event_tx, event_rx) = channel::<FeedEvent>();
        let (cancel_tx, cancel_rx) = watch::channel(0u64);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("quote-feed".to_string())
            .spawn(move || {
                // Exits once the poller (and with it the job sender) is dropped.
                while let Ok(job) = job_rx.recv() {
                    let event = runtime.block_on(run_fetch(
                        provider.as_ref(),
                        job,
                        timeout,
                        cancel_rx.clone(),
                    ));
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            job_tx: Some(job_tx),
            event_rx,
            cancel_tx,
        })
    }

    /// Queue a fetch. Returns false if the worker has gone away.
    pub fn request(&self, request: QuoteRequest) -> bool {
        let Some(tx) = &self.job_tx else {
            return false;
        };
        #[cfg(debug_assertions)]
        if DF.log_feed_polls {
            log::info!("Poll requested: {:?}", request);
        }
        let generation = *self.cancel_tx.borrow();
        tx.send(FetchJob {
            request,
            generation,
        })
        .is_ok()
    }

    /// Abandon every fetch issued so far. Each one still reports `FeedEvent::Cancelled`.
    pub fn cancel(&self) {
        self.cancel_tx.send_modify(|generation| *generation += 1);
    }

    pub fn try_next_event(&self) -> Option<FeedEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for FeedPoller {
    fn drop(&mut self) {
        self.cancel();
        self.job_tx.take();
    }
}

async fn run_fetch(
    provider: &dyn QuoteProvider,
    job: FetchJob,
    timeout: Duration,
    mut cancel_rx: watch::Receiver<u64>,
) -> FeedEvent {
    let generation = job.generation;
    let symbol = job.request.symbol.clone();
    if *cancel_rx.borrow() > generation {
        return FeedEvent::Cancelled;
    }

    tokio::select! {
        result = tokio::time::timeout(timeout, provider.fetch_time_series(&job.request)) => {
            match result {
                Ok(Ok(batch)) => FeedEvent::Batch { symbol, batch },
                Ok(Err(e)) => FeedEvent::Failed(e),
                Err(_) => FeedEvent::Failed(FeedError::Timeout(timeout)),
            }
        }
        // Also fires if the poller is dropped mid-fetch.
        _ = cancel_rx.wait_for(|current| *current > generation) => FeedEvent::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::quote_feed::QuoteRecord;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Instant;

    struct SlowProvider {
        delay: Duration,
        result: Result<QuoteBatch, FeedError>,
    }

    #[async_trait]
    impl QuoteProvider for SlowProvider {
        async fn fetch_time_series(&self, _: &QuoteRequest) -> Result<QuoteBatch, FeedError> {
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    fn request(symbol: &str) -> QuoteRequest {
        QuoteRequest {
            symbol: symbol.into(),
            interval: "1min".into(),
            api_key: "test".into(),
        }
    }

    fn one_record_batch() -> QuoteBatch {
        QuoteBatch {
            records: vec![QuoteRecord {
                datetime: NaiveDate::from_ymd_opt(2024, 3, 1)
                    .and_then(|d| d.and_hms_opt(9, 30, 0))
                    .unwrap(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
            }],
            skipped: 0,
        }
    }

    fn wait_for_event(poller: &FeedPoller) -> FeedEvent {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(event) = poller.try_next_event() {
                return event;
            }
            assert!(Instant::now() < deadline, "no event from worker");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_batch_is_delivered_with_symbol() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::ZERO,
            result: Ok(one_record_batch()),
        });
        let poller = FeedPoller::spawn(provider, Duration::from_secs(1)).unwrap();
        assert!(poller.request(request("IBM")));

        match wait_for_event(&poller) {
            FeedEvent::Batch { symbol, batch } => {
                assert_eq!(symbol, "IBM");
                assert_eq!(batch, one_record_batch());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_slow_provider_times_out() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_secs(2),
            result: Ok(QuoteBatch::default()),
        });
        let limit = Duration::from_millis(50);
        let poller = FeedPoller::spawn(provider, limit).unwrap();
        poller.request(request("IBM"));

        match wait_for_event(&poller) {
            FeedEvent::Failed(FeedError::Timeout(d)) => assert_eq!(d, limit),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_provider_error_is_forwarded() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::ZERO,
            result: Err(FeedError::Status(503)),
        });
        let poller = FeedPoller::spawn(provider, Duration::from_secs(1)).unwrap();
        poller.request(request("IBM"));

        assert!(matches!(
            wait_for_event(&poller),
            FeedEvent::Failed(FeedError::Status(503))
        ));
    }

    #[test]
    fn test_cancel_abandons_in_flight_fetch() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_secs(10),
            result: Ok(one_record_batch()),
        });
        let poller = FeedPoller::spawn(provider, Duration::from_secs(30)).unwrap();
        poller.request(request("IBM"));
        thread::sleep(Duration::from_millis(20));

        let started = Instant::now();
        poller.cancel();
        assert!(matches!(wait_for_event(&poller), FeedEvent::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_requests_after_cancel_still_run() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::ZERO,
            result: Ok(one_record_batch()),
        });
        let poller = FeedPoller::spawn(provider, Duration::from_secs(1)).unwrap();
        poller.cancel();
        poller.request(request("IBM"));

        assert!(matches!(wait_for_event(&poller), FeedEvent::Batch { .. }));
    }
}
