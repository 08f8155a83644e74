//! Background layout thread with a single-writer/single-reader handoff.
//!
//! Requests travel to the worker over one channel and results come back over
//! another; no state is shared. Each request carries a generation number so
//! the reader can drop results that were superseded while in flight.

use crate::layout::{self, HeightTable, LayoutParams, LayoutPolicy, LayoutResult};
use crate::model::{LayoutError, Track};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

use super::SheetState;

/// Worker thread is no longer running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Layout worker has stopped")]
pub struct WorkerStopped;

/// One layout job.
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    /// Increasing sequence number assigned by [`LayoutWorker::submit`].
    pub generation: u64,
    /// Placement rule.
    pub policy: LayoutPolicy,
    /// Layout constants.
    pub params: LayoutParams,
    /// Tracks to lay out.
    pub tracks: Vec<Track>,
    /// Preferred heights.
    pub heights: HeightTable,
}

/// Outcome of one layout job.
#[derive(Debug, Clone)]
pub struct LayoutResponse {
    /// Generation of the request this answers.
    pub generation: u64,
    /// Layout or the error that aborted it.
    pub outcome: Result<LayoutResult, LayoutError>,
}

/// Handle to the background layout thread.
///
/// Dropping the handle closes the request channel and joins the thread.
pub struct LayoutWorker {
    requests: Option<Sender<LayoutRequest>>,
    responses: Receiver<LayoutResponse>,
    handle: Option<JoinHandle<()>>,
    next_generation: u64,
}

impl LayoutWorker {
    /// Start the worker thread.
    pub fn spawn() -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<LayoutRequest>();
        let (response_tx, response_rx) = mpsc::channel::<LayoutResponse>();
        let handle = thread::Builder::new()
            .name("layout-worker".to_string())
            .spawn(move || run(request_rx, response_tx))?;
        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
            next_generation: 1,
        })
    }

    /// Queue a layout job and return its generation.
    pub fn submit(
        &mut self,
        policy: LayoutPolicy,
        params: LayoutParams,
        tracks: Vec<Track>,
        heights: HeightTable,
    ) -> Result<u64, WorkerStopped> {
        let generation = self.next_generation;
        let request = LayoutRequest {
            generation,
            policy,
            params,
            tracks,
            heights,
        };
        self.requests
            .as_ref()
            .ok_or(WorkerStopped)?
            .send(request)
            .map_err(|_| WorkerStopped)?;
        self.next_generation += 1;
        Ok(generation)
    }

    /// Queue a snapshot of `sheet`.
    pub fn submit_sheet(&mut self, sheet: &SheetState) -> Result<u64, WorkerStopped> {
        self.submit(
            sheet.policy(),
            *sheet.params(),
            sheet.tracks().to_vec(),
            sheet.heights().clone(),
        )
    }

    /// Generation of the most recent submission, if any.
    pub fn latest_generation(&self) -> Option<u64> {
        self.next_generation.checked_sub(1).filter(|&g| g > 0)
    }

    /// Newest finished response without blocking, discarding older ones.
    pub fn try_latest(&self) -> Option<LayoutResponse> {
        self.responses.try_iter().last()
    }

    /// Block until a response arrives, then drain to the newest available.
    pub fn wait_latest(&self) -> Result<LayoutResponse, WorkerStopped> {
        let first = self.responses.recv().map_err(|_| WorkerStopped)?;
        Ok(self.responses.try_iter().last().unwrap_or(first))
    }

    /// Block until the response for the most recent submission arrives.
    pub fn wait_current(&self) -> Result<LayoutResponse, WorkerStopped> {
        let target = self.latest_generation().ok_or(WorkerStopped)?;
        loop {
            let response = self.responses.recv().map_err(|_| WorkerStopped)?;
            if response.generation >= target {
                return Ok(response);
            }
            trace!(generation = response.generation, target, "Dropping superseded layout");
        }
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Layout worker panicked");
            }
        }
    }
}

impl std::fmt::Debug for LayoutWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutWorker")
            .field("next_generation", &self.next_generation)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

/// Worker loop: skip to the newest queued request, lay it out, send it back.
fn run(requests: Receiver<LayoutRequest>, responses: Sender<LayoutResponse>) {
    while let Ok(first) = requests.recv() {
        let request = requests.try_iter().last().unwrap_or(first);
        let heights = &request.heights;
        let outcome = layout::layout(request.policy, &request.tracks, &request.params, |id, interval| {
            heights.preferred_height(id, interval)
        });
        debug!(generation = request.generation, ok = outcome.is_ok(), "Layout job finished");

        let response = LayoutResponse {
            generation: request.generation,
            outcome,
        };
        if responses.send(response).is_err() {
            break;
        }
    }
    trace!("Layout worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interval, TrackIndex};

    fn tracks(spans: &[(i64, i64)]) -> Vec<Track> {
        let owner = TrackIndex::new(0);
        let cells = spans
            .iter()
            .map(|&(on, off)| Interval::new(on, off, owner).unwrap())
            .collect();
        vec![Track::new(owner, cells).unwrap()]
    }

    #[test]
    fn computes_layout_off_thread() {
        let mut worker = LayoutWorker::spawn().unwrap();
        let generation = worker
            .submit(
                LayoutPolicy::Weak,
                LayoutParams::default(),
                tracks(&[(0, 100), (100, 200)]),
                HeightTable::new(20),
            )
            .unwrap();

        let response = worker.wait_current().unwrap();
        assert_eq!(response.generation, generation);
        assert_eq!(response.outcome.unwrap().content_height(), 40 + 5);
    }

    #[test]
    fn generations_increase() {
        let mut worker = LayoutWorker::spawn().unwrap();
        assert_eq!(worker.latest_generation(), None);
        let a = worker
            .submit(LayoutPolicy::Ordinal, LayoutParams::default(), Vec::new(), HeightTable::new(1))
            .unwrap();
        let b = worker
            .submit(LayoutPolicy::Ordinal, LayoutParams::default(), Vec::new(), HeightTable::new(1))
            .unwrap();
        assert!(b > a);
        assert_eq!(worker.latest_generation(), Some(b));
        assert_eq!(worker.wait_current().unwrap().generation, b);
    }

    #[test]
    fn errors_travel_back() {
        let mut worker = LayoutWorker::spawn().unwrap();
        worker
            .submit(LayoutPolicy::Weak, LayoutParams::default(), tracks(&[(0, 10)]), HeightTable::new(-1))
            .unwrap();
        let response = worker.wait_current().unwrap();
        assert!(matches!(
            response.outcome,
            Err(LayoutError::NegativePreferredHeight { .. })
        ));
    }

    #[test]
    fn try_latest_is_empty_before_any_job() {
        let worker = LayoutWorker::spawn().unwrap();
        assert!(worker.try_latest().is_none());
    }

    #[test]
    fn sheet_snapshot_round_trips_through_worker() {
        let mut sheet = SheetState::new(
            tracks(&[(0, 100)]),
            HeightTable::new(25),
            LayoutPolicy::Ordinal,
            LayoutParams::default(),
        );
        let mut worker = LayoutWorker::spawn().unwrap();
        worker.submit_sheet(&sheet).unwrap();
        let response = worker.wait_current().unwrap();
        let result = sheet.apply(response.outcome).unwrap();
        assert_eq!(result.content_height(), 25 + 5);
        assert!(!sheet.is_stale());
    }
}
