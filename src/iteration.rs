use std::collections::HashSet;

use futures::stream::{self, Stream};
use log::trace;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::caching::{DnsResolver, Resolve};
use crate::config::IterationConfig;
use crate::echo::IcmpEcho;
use crate::error::Result;
use crate::probe::Echo;
use crate::report::HostReport;
use crate::scheduler::ProbeScheduler;

/// Reports of one completed round.
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    /// 1-based position of the round.
    pub index: u64,
    /// One report per unique target, in the order targets were first given.
    pub reports: Vec<HostReport>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum State {
    Idle,
    Running,
    Sleeping { next_start: Instant },
    Terminated,
}

/// Drives repeated probe rounds against a fixed set of targets.
///
/// Rounds never overlap. Between rounds the loop sleeps until `interval` has
/// passed since the previous round started. Cancellation is observed only
/// between rounds: a round in progress always completes.
#[derive(Debug)]
pub struct IterationLoop<E = IcmpEcho, R = DnsResolver> {
    scheduler: ProbeScheduler<E, R>,
    targets: Vec<String>,
    config: IterationConfig,
    cancellation: CancellationToken,
    state: State,
    completed: u64,
}

impl<E: Echo, R: Resolve> IterationLoop<E, R> {
    /// Creates an idle loop. Duplicate targets are probed once, at the
    /// position they first appear.
    ///
    /// # Errors
    /// Fails if `config` holds an out-of-range setting.
    pub fn new<I, S>(scheduler: ProbeScheduler<E, R>, targets: I, config: IterationConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;
        let mut seen = HashSet::new();
        let unique: Vec<String> = targets
            .into_iter()
            .map(Into::into)
            .filter(|target: &String| seen.insert(target.clone()))
            .collect();
        Ok(Self {
            scheduler,
            targets: unique,
            config,
            cancellation: CancellationToken::new(),
            state: State::Idle,
            completed: 0,
        })
    }

    /// Uses `token` to stop the loop at the next round boundary.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn is_terminated(&self) -> bool {
        self.state == State::Terminated
    }

    /// Runs the next round, first sleeping out the rest of the interval if a
    /// round came before. Returns `None` once the count is exhausted or the
    /// loop was cancelled.
    pub async fn next_round(&mut self) -> Option<Round> {
        match self.state {
            State::Terminated => return None,
            State::Sleeping { next_start } => {
                tokio::select! {
                    _ = tokio::time::sleep_until(next_start) => {},
                    _ = self.cancellation.cancelled() => {},
                }
            }
            State::Idle | State::Running => {}
        }
        if self.cancellation.is_cancelled() {
            self.transition(State::Terminated);
            return None;
        }

        let started = Instant::now();
        self.transition(State::Running);
        let probes = self.scheduler.run_round(&self.targets, &self.config).await;
        let reports = probes
            .into_iter()
            .map(|probes| HostReport::from_outcomes(probes.host, probes.address, &probes.outcomes))
            .collect();
        self.completed += 1;

        let next = if self.config.has_round_after(self.completed) {
            State::Sleeping {
                next_start: started + self.config.interval,
            }
        } else {
            State::Terminated
        };
        self.transition(next);

        Some(Round {
            index: self.completed,
            reports,
        })
    }

    /// Turns the loop into a lazy stream of rounds. A round is only run when
    /// the consumer asks for it, so dropping the stream stops the loop.
    pub fn into_rounds(self) -> impl Stream<Item = Round> {
        stream::unfold(self, |mut this| async move {
            let round = this.next_round().await?;
            Some((round, this))
        })
    }

    fn transition(&mut self, next: State) {
        trace!("iteration loop {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
