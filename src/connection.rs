//! Process-wide connection cache.
//!
//! Serverless-style deployments cold-start often and run many request
//! handlers as interleaved tasks, so the cache must hand every caller the
//! same handle while issuing at most one connection attempt at a time:
//!
//! - an established handle is returned immediately, no new attempt;
//! - callers arriving while an attempt is in flight await that same attempt
//!   through a shared future and all receive its result;
//! - a failed attempt is forgotten (the memoized handle, if any, is kept) so
//!   the next `acquire` retries from scratch.
//!
//! The cache is injected into stores rather than living in a global, which
//! keeps the core testable against a fake connector.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::AcquireError;

/// Something that can establish a live handle to the backing store.
///
/// Implementations read their configuration at connect time, so a missing
/// connection string surfaces at the first acquisition, not at startup.
#[async_trait]
pub trait Connect: Send + Sync + 'static {
    /// Cheap-to-clone handle to the established connection
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle, AcquireError>;
}

type InFlight<H> = Shared<BoxFuture<'static, Result<H, AcquireError>>>;

struct CacheState<H> {
    handle: Option<H>,
    /// Attempt currently in flight, tagged with its generation so a failed
    /// waiter never clears a newer attempt it did not take part in.
    in_flight: Option<(u64, InFlight<H>)>,
    generation: u64,
}

/// Lazily-initialized, process-wide connection cache.
///
/// Cloning shares the underlying state: every clone observes the same
/// handle and the same in-flight attempt.
pub struct ConnectionCache<C: Connect> {
    connector: Arc<C>,
    state: Arc<Mutex<CacheState<C::Handle>>>,
}

impl<C: Connect> Clone for ConnectionCache<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: Connect> ConnectionCache<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            state: Arc::new(Mutex::new(CacheState {
                handle: None,
                in_flight: None,
                generation: 0,
            })),
        }
    }

    /// Get the established handle, joining or starting a connection attempt
    /// as needed.
    ///
    /// # Errors
    ///
    /// `AcquireError::Config` when the connection target is not configured;
    /// `AcquireError::Connection` when the attempt fails. Either way the
    /// next call retries from scratch.
    pub async fn acquire(&self) -> Result<C::Handle, AcquireError> {
        // The lock is never held across an await.
        let (generation, attempt) = {
            let mut state = self.state.lock().unwrap();

            if let Some(handle) = &state.handle {
                return Ok(handle.clone());
            }

            match &state.in_flight {
                Some((generation, attempt)) => (*generation, attempt.clone()),
                None => {
                    state.generation += 1;
                    let generation = state.generation;
                    let connector = Arc::clone(&self.connector);
                    let attempt = async move { connector.connect().await }.boxed().shared();
                    state.in_flight = Some((generation, attempt.clone()));
                    (generation, attempt)
                }
            }
        };

        match attempt.await {
            Ok(handle) => {
                let mut state = self.state.lock().unwrap();
                state.handle = Some(handle.clone());
                if matches!(state.in_flight, Some((g, _)) if g == generation) {
                    state.in_flight = None;
                }
                Ok(handle)
            }
            Err(err) => {
                let mut state = self.state.lock().unwrap();
                if matches!(state.in_flight, Some((g, _)) if g == generation) {
                    state.in_flight = None;
                }
                Err(err)
            }
        }
    }

    /// Whether a handle has been established
    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().handle.is_some()
    }
}
