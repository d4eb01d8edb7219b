//! Generic async job handling for GUI operations
//!
//! Polls a single background task from the GUI thread without blocking the frame.

use anyhow::{anyhow, Result};
use std::future::Future;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tokio::runtime::Handle;

/// A one-shot background task whose result is picked up by polling.
pub struct AsyncJob<T> {
    receiver: Option<Receiver<Result<T>>>,
}

impl<T: Send + 'static> AsyncJob<T> {
    /// Run `future` on `runtime` and hand back a pollable job.
    pub fn spawn<F>(runtime: &Handle, future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        runtime.spawn(async move {
            let _ = tx.send(future.await);
        });
        Self::new(rx)
    }
}

impl<T> AsyncJob<T> {
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Returns Some(result) once the job has completed, None while it is running
    pub fn poll(&mut self) -> Option<Result<T>> {
        if let Some(rx) = &self.receiver {
            match rx.try_recv() {
                Ok(res) => {
                    self.receiver = None;
                    return Some(res);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    return Some(Err(anyhow!("Worker task disconnected")));
                }
            }
        }
        None
    }

    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn poll_until_done<T>(job: &mut AsyncJob<T>) -> Result<T> {
        for _ in 0..500 {
            if let Some(result) = job.poll() {
                return result;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("job never completed");
    }

    #[tokio::test]
    async fn test_spawned_job_delivers_result_once() {
        let mut job = AsyncJob::spawn(&Handle::current(), async { Ok(42) });
        assert!(job.is_running());
        assert_eq!(poll_until_done(&mut job).await.unwrap(), 42);
        assert!(!job.is_running());
        assert!(job.poll().is_none());
    }

    #[tokio::test]
    async fn test_spawned_job_propagates_error() {
        let mut job: AsyncJob<()> =
            AsyncJob::spawn(&Handle::current(), async { Err(anyhow!("verification failed")) });
        let err = poll_until_done(&mut job).await.unwrap_err();
        assert_eq!(err.to_string(), "verification failed");
    }

    #[test]
    fn test_dropped_sender_reports_disconnect() {
        let (tx, rx) = mpsc::channel::<Result<u8>>();
        let mut job = AsyncJob::new(rx);
        assert!(job.poll().is_none());
        drop(tx);
        let err = job.poll().unwrap().unwrap_err();
        assert!(err.to_string().contains("disconnected"));
        assert!(!job.is_running());
    }
}
