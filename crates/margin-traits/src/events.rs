//! Progress events emitted during a screening run.
//!
//! The screening core reports what it is doing through an [`EventSink`].
//! Sinks receive [`TimestampedEvent`]s and decide how to present them; the
//! `Display` form is the one-line text used by log panels.

use chrono::{DateTime, Local};
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Progress for one successfully fetched ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerProgress {
    /// Symbol that was processed.
    pub ticker: String,
    /// Company name reported by the provider or the ticker list.
    pub company: Option<String>,
    /// 1-based position in the ticker list.
    pub current: usize,
    /// Length of the ticker list.
    pub total: usize,
}

impl TickerProgress {
    /// Share of the list processed so far, in percent.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for TickerProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Processing {}", self.ticker)?;
        if let Some(company) = self.company.as_deref().filter(|c| !c.is_empty()) {
            write!(f, " ({company})")?;
        }
        write!(
            f,
            " ({}/{}, {:.1}%)",
            self.current,
            self.total,
            self.percentage()
        )
    }
}

/// Something that happened during a screening run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreeningEvent {
    /// The run started.
    Started {
        /// Market display name.
        market: String,
    },
    /// The market's ticker list was read.
    TickersLoaded {
        /// Market display name.
        market: String,
        /// Internal market code.
        code: String,
        /// Number of tickers in the list.
        count: usize,
    },
    /// One ticker was fetched and recorded.
    TickerProcessed(TickerProgress),
    /// One ticker produced no record.
    TickerSkipped {
        /// Symbol that was skipped.
        ticker: String,
        /// Failure detail.
        reason: String,
    },
    /// All tickers were attempted.
    FetchSummary {
        /// Tickers that produced a record.
        succeeded: usize,
        /// Tickers attempted.
        total: usize,
        /// `succeeded / total * 100`, or 0 for an empty list.
        success_rate: f64,
    },
    /// The Graham baseline was applied.
    BaselineApplied {
        /// Rows that passed.
        matches: usize,
    },
    /// Custom thresholds were applied.
    CustomApplied {
        /// Rows before.
        before: usize,
        /// Rows after.
        after: usize,
    },
    /// The run finished.
    Completed {
        /// Rows in the final result.
        matches: usize,
    },
    /// The run failed.
    Failed {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for ScreeningEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { market } => write!(f, "Starting Graham Screener for {market}"),
            Self::TickersLoaded { market, count, .. } => {
                write!(f, "Successfully loaded {count} tickers for {market}")
            }
            Self::TickerProcessed(progress) => progress.fmt(f),
            Self::TickerSkipped { reason, .. } => write!(f, "[ERROR] {reason}"),
            Self::FetchSummary {
                succeeded,
                total,
                success_rate,
            } => write!(
                f,
                "Successfully processed {succeeded}/{total} tickers ({success_rate:.2}%)"
            ),
            Self::BaselineApplied { matches } => {
                write!(f, "Applied Graham filters - Found {matches} initial matches")
            }
            Self::CustomApplied { before, after } => {
                write!(f, "Custom filters applied - {before} -> {after} stocks")
            }
            Self::Completed { matches } => write!(
                f,
                "Screening complete! Found {matches} stocks matching your criteria"
            ),
            Self::Failed { message } => write!(f, "Error during screening: {message}"),
        }
    }
}

/// An event with the wall-clock time it was emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedEvent {
    /// Emission time.
    pub at: DateTime<Local>,
    /// The event.
    pub event: ScreeningEvent,
}

impl TimestampedEvent {
    /// Stamp an event with the current time.
    #[must_use]
    pub fn now(event: ScreeningEvent) -> Self {
        Self {
            at: Local::now(),
            event,
        }
    }
}

impl fmt::Display for TimestampedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.event)
    }
}

/// Receiver of screening events.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: TimestampedEvent);
}

impl<F> EventSink for F
where
    F: Fn(TimestampedEvent) + Send + Sync,
{
    fn emit(&self, event: TimestampedEvent) {
        self(event);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: TimestampedEvent) {}
}

/// Sink that forwards events to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: TimestampedEvent) {
        match &event.event {
            ScreeningEvent::TickerSkipped { .. } => tracing::warn!("{}", event.event),
            ScreeningEvent::Failed { .. } => tracing::error!("{}", event.event),
            _ => tracing::info!("{}", event.event),
        }
    }
}

/// Sink that sends events over an unbounded Tokio channel.
///
/// Sending to a closed channel is silently ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink(UnboundedSender<TimestampedEvent>);

impl ChannelSink {
    /// Wrap the sending half of a channel.
    #[must_use]
    pub const fn new(sender: UnboundedSender<TimestampedEvent>) -> Self {
        Self(sender)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: TimestampedEvent) {
        let _ = self.0.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    fn progress(company: Option<&str>) -> TickerProgress {
        TickerProgress {
            ticker: "BARC.L".to_string(),
            company: company.map(str::to_string),
            current: 3,
            total: 12,
        }
    }

    #[test]
    fn test_progress_percentage() {
        assert_relative_eq!(progress(None).percentage(), 25.0);

        let empty = TickerProgress {
            current: 0,
            total: 0,
            ..progress(None)
        };
        assert_relative_eq!(empty.percentage(), 0.0);
    }

    #[test]
    fn test_progress_display() {
        assert_eq!(
            progress(Some("Barclays")).to_string(),
            "Processing BARC.L (Barclays) (3/12, 25.0%)"
        );
        assert_eq!(
            progress(Some("")).to_string(),
            "Processing BARC.L (3/12, 25.0%)"
        );
    }

    #[test]
    fn test_event_display() {
        let event = ScreeningEvent::CustomApplied {
            before: 10,
            after: 4,
        };
        assert_eq!(event.to_string(), "Custom filters applied - 10 -> 4 stocks");

        let event = ScreeningEvent::FetchSummary {
            succeeded: 1,
            total: 3,
            success_rate: 100.0 / 3.0,
        };
        assert_eq!(
            event.to_string(),
            "Successfully processed 1/3 tickers (33.33%)"
        );
    }

    #[test]
    fn test_timestamped_display_prefix() {
        let stamped = TimestampedEvent::now(ScreeningEvent::Completed { matches: 2 });
        let text = stamped.to_string();
        assert!(text.starts_with('['));
        assert_eq!(&text[9..11], "] ");
        assert!(text.ends_with("Found 2 stocks matching your criteria"));
    }

    #[test]
    fn test_closure_sink_collects() {
        let seen = Mutex::new(Vec::new());
        let sink = |e: TimestampedEvent| seen.lock().unwrap().push(e.event);
        sink.emit(TimestampedEvent::now(ScreeningEvent::BaselineApplied {
            matches: 5,
        }));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[ScreeningEvent::BaselineApplied { matches: 5 }]
        );
    }

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);
        sink.emit(TimestampedEvent::now(ScreeningEvent::Started {
            market: "NYSE".to_string(),
        }));
        drop(sink);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event.to_string(), "Starting Graham Screener for NYSE");
        assert!(rx.recv().await.is_none());
    }
}
