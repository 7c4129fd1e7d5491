// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The tile worker pool.
//!
//! One long-lived thread per tile.  Each worker sits on its own job
//! channel.  To render a frame the coordinator bumps the generation,
//! sends every worker a job tagged with it, and then collects reports
//! off a single shared channel until it has exactly one per worker for
//! that generation.  A job is queued in the worker's channel whether or
//! not the worker is already waiting on it, so there is no wakeup to
//! miss and nothing to re-broadcast.
//!
//! The tile's pixel buffer travels inside the job and comes back inside
//! the report.  While a worker renders it holds the only reference to
//! its own tile's pixels and nothing else, so tiles cannot overlap in
//! memory no matter what the shader does.  Returned tiles are held
//! until the last report is in, and only then copied into the frame
//! buffer, so the frame buffer only ever holds whole frames.
//!
//! A worker that dies mid-frame is noticed the next time the report
//! wait times out, and the frame fails with `WorkerLost`.  The pool is
//! broken from then on: every later render fails the same way without
//! dispatching anything.  A worker that is alive but never finishes is
//! not detected; the coordinator just keeps waiting.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::context::RenderContext;
use crate::error::{RenderError, Result};
use crate::planes::FrameSize;
use crate::present::FrameSnapshot;
use crate::shader::{render_rect, Frame, Shader};
use crate::tiles::{Rect, Tile};
use crate::view::ViewState;

enum Job {
    Render { frame: Frame, pixels: Vec<u32> },
    Shutdown,
}

struct Report {
    generation: u64,
    owner: usize,
    pixels: Vec<u32>,
}

struct Worker {
    tile: Tile,
    jobs: Sender<Job>,
    handle: Option<JoinHandle<()>>,
    // The tile's pixels while they are not out on a job.
    buffer: Option<Vec<u32>>,
    // The last generation this worker has reported for.
    reported: u64,
}

/// What a call to `RenderPool::render` did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The view was clean; the frame buffer was left alone.
    Unchanged,
    /// Every tile was recomputed.
    Rendered {
        /// The generation now in the frame buffer.
        generation: u64,
        /// Wall time from dispatch to the last report.
        elapsed: Duration,
    },
}

/// A fixed pool of tile workers and the frame buffer they fill.
pub struct RenderPool {
    workers: Vec<Worker>,
    reports: Receiver<Report>,
    frame: Vec<u32>,
    size: FrameSize,
    generation: u64,
    // The generation whose pixels are all in the frame buffer.
    finished: u64,
    completed: usize,
    stall_timeout: Duration,
    // The first worker found dead, and the generation it was lost in.
    lost: Option<(usize, u64)>,
}

fn worker_loop<S: Shader>(tile: Tile, shader: Arc<S>, jobs: Receiver<Job>, reports: Sender<Report>) {
    debug!("Worker {} assigned {}", tile.owner, tile.bounds);
    for job in jobs.iter() {
        match job {
            Job::Render { frame, mut pixels } => {
                trace!("Worker {} rendering frame {}", tile.owner, frame.generation);
                render_rect(&*shader, &frame, &tile.bounds, &mut pixels);
                let report = Report {
                    generation: frame.generation,
                    owner: tile.owner,
                    pixels,
                };
                if reports.send(report).is_err() {
                    break;
                }
            }
            Job::Shutdown => break,
        }
    }
    debug!("Exiting worker {}", tile.owner);
}

// Copies a tile's row-major pixels into the frame.
fn blit(frame: &mut [u32], width: usize, bounds: &Rect, pixels: &[u32]) {
    let tile_width = bounds.width();
    if tile_width == 0 {
        return;
    }
    for (row, source) in bounds.rows().zip(pixels.chunks(tile_width)) {
        let start = row * width + bounds.left;
        frame[start..start + tile_width].copy_from_slice(source);
    }
}

impl RenderPool {
    /// Starts one worker per tile of the context.  If any thread fails
    /// to start, the ones already running are shut down and joined
    /// before the error is returned.
    pub fn spawn<S: Shader>(context: &RenderContext, shader: S) -> Result<RenderPool> {
        let shader = Arc::new(shader);
        let (report_tx, report_rx) = channel::unbounded();
        let mut pool = RenderPool {
            workers: Vec::with_capacity(context.tiles().len()),
            reports: report_rx,
            frame: vec![0; context.size().len()],
            size: context.size(),
            generation: 0,
            finished: 0,
            completed: 0,
            stall_timeout: context.stall_timeout(),
            lost: None,
        };

        for &tile in context.tiles() {
            let (job_tx, job_rx) = channel::unbounded();
            let shader = Arc::clone(&shader);
            let reports = report_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("tile-{}", tile.owner))
                .spawn(move || worker_loop(tile, shader, job_rx, reports))
                .map_err(|cause| RenderError::Spawn {
                    owner: tile.owner,
                    cause,
                })?;
            pool.workers.push(Worker {
                tile,
                jobs: job_tx,
                handle: Some(handle),
                buffer: Some(vec![0; tile.bounds.area()]),
                reported: 0,
            });
        }

        info!(
            "Started {} tile workers for a {} frame",
            pool.workers.len(),
            pool.size
        );
        Ok(pool)
    }

    /// Renders the frame if the view is dirty, and returns once every
    /// worker has reported for it.  The dirty flag is cleared only after
    /// the last report.  A clean view is a no-op: nothing is sent, the
    /// counters and the frame buffer are untouched.
    ///
    /// Once a worker has been lost every call fails with the same
    /// `WorkerLost` and sends nothing.
    pub fn render(&mut self, state: &mut ViewState) -> Result<FrameOutcome> {
        if !state.is_dirty() {
            return Ok(FrameOutcome::Unchanged);
        }
        if self.lost.is_none() {
            if let Some(owner) = self.dead_worker(|_| true) {
                self.lost = Some((owner, self.generation));
            }
        }
        if let Some((owner, generation)) = self.lost {
            self.drain();
            return Err(RenderError::WorkerLost { owner, generation });
        }

        let started = Instant::now();
        self.generation += 1;
        self.completed = 0;
        let frame = Frame {
            generation: self.generation,
            size: self.size,
            view: state.view(),
        };

        let mut refused = None;
        for worker in &mut self.workers {
            let area = worker.tile.bounds.area();
            let pixels = worker.buffer.take().unwrap_or_else(|| vec![0; area]);
            if let Err(failed) = worker.jobs.send(Job::Render { frame, pixels }) {
                if let Job::Render { pixels, .. } = failed.into_inner() {
                    worker.buffer = Some(pixels);
                }
                refused = Some(worker.tile.owner);
                break;
            }
        }
        if let Some(owner) = refused {
            return Err(self.lose(owner));
        }

        while self.completed < self.workers.len() {
            match self.reports.recv_timeout(self.stall_timeout) {
                Ok(report) => self.accept(report),
                Err(RecvTimeoutError::Timeout) => self.check_workers()?,
                // Every worker has dropped its sender, so all of them are gone.
                Err(RecvTimeoutError::Disconnected) => {
                    let generation = self.generation;
                    let waiting = self
                        .workers
                        .iter()
                        .find(|worker| worker.reported != generation)
                        .map(|worker| worker.tile.owner);
                    return match waiting {
                        Some(owner) => Err(self.lose(owner)),
                        None => Err(RenderError::PoolClosed),
                    };
                }
            }
        }

        for worker in &self.workers {
            if let Some(pixels) = &worker.buffer {
                blit(&mut self.frame, self.size.width, &worker.tile.bounds, pixels);
            }
        }
        self.finished = self.generation;
        state.clear_dirty();
        let elapsed = started.elapsed();
        info!(
            "Frame {} rendered in {} us",
            self.generation,
            elapsed.as_micros()
        );
        info!("{}", frame.view);
        Ok(FrameOutcome::Rendered {
            generation: self.generation,
            elapsed,
        })
    }

    fn accept(&mut self, report: Report) {
        let generation = self.generation;
        let worker = match self.workers.get_mut(report.owner) {
            Some(worker) => worker,
            None => {
                warn!("Report from unknown worker {}", report.owner);
                return;
            }
        };

        if report.generation != generation {
            warn!(
                "Worker {} reported stale frame {} during frame {}",
                report.owner, report.generation, generation
            );
            if worker.reported != generation {
                worker.buffer = Some(report.pixels);
            }
            return;
        }
        if worker.reported == generation {
            warn!(
                "Worker {} reported twice for frame {}",
                report.owner, generation
            );
            return;
        }

        worker.buffer = Some(report.pixels);
        worker.reported = generation;
        self.completed += 1;
    }

    // The first worker matching `which` whose thread has exited.
    fn dead_worker<F: Fn(&Worker) -> bool>(&self, which: F) -> Option<usize> {
        self.workers
            .iter()
            .filter(|worker| which(worker))
            .find(|worker| {
                worker
                    .handle
                    .as_ref()
                    .map_or(true, |handle| handle.is_finished())
            })
            .map(|worker| worker.tile.owner)
    }

    // Marks the pool broken and takes back whatever reports are queued.
    fn lose(&mut self, owner: usize) -> RenderError {
        error!("Worker {} lost during frame {}", owner, self.generation);
        self.lost = Some((owner, self.generation));
        self.drain();
        RenderError::WorkerLost {
            owner,
            generation: self.generation,
        }
    }

    fn drain(&mut self) {
        while let Ok(report) = self.reports.try_recv() {
            if let Some(worker) = self.workers.get_mut(report.owner) {
                worker.buffer = Some(report.pixels);
            }
        }
    }

    fn check_workers(&mut self) -> Result<()> {
        let generation = self.generation;
        if let Some(owner) = self.dead_worker(|worker| worker.reported != generation) {
            return Err(self.lose(owner));
        }
        debug!(
            "Frame {} still waiting on {} of {} tiles",
            self.generation,
            self.workers.len() - self.completed,
            self.workers.len()
        );
        Ok(())
    }

    /// The frame buffer as of the last completed render.
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            pixels: &self.frame,
            size: self.size,
            generation: self.finished,
        }
    }

    /// The last generation dispatched; 0 before the first render.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reports counted toward the current generation.
    pub fn completed_count(&self) -> usize {
        self.completed
    }

    /// The number of workers, one per tile.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stops every worker and waits for them to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        for worker in &self.workers {
            // A worker that already exited has dropped its receiver.
            let _ = worker.jobs.send(Job::Shutdown);
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    warn!("Worker {} panicked", worker.tile.owner);
                }
            }
        }
    }
}

impl Drop for RenderPool {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::planes::Pixel;
    use crate::tiles::Grid;

    struct Stamp;

    impl Shader for Stamp {
        fn shade(&self, frame: &Frame, _pixel: Pixel) -> u32 {
            frame.generation as u32
        }
    }

    struct PanicsOnRow(usize);

    impl Shader for PanicsOnRow {
        fn shade(&self, _frame: &Frame, pixel: Pixel) -> u32 {
            if pixel.1 == self.0 {
                panic!("row {} is cursed", self.0);
            }
            1
        }
    }

    fn context(width: usize, height: usize, rows: usize, cols: usize) -> RenderContext {
        RenderContext::new(&Config {
            size: FrameSize::new(width, height),
            grid: Grid { rows, cols },
            stall_timeout: Duration::from_millis(20),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn blit_places_rows() {
        let mut frame = vec![0; 12];
        let bounds = Rect {
            top: 1,
            left: 1,
            bottom: 3,
            right: 3,
        };
        blit(&mut frame, 4, &bounds, &[1, 2, 3, 4]);
        assert_eq!(frame, vec![0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0]);
    }

    #[test]
    fn one_frame_counts_every_worker_once() {
        let mut pool = RenderPool::spawn(&context(30, 20, 4, 5), Stamp).unwrap();
        let mut state = ViewState::default();
        assert_eq!(pool.generation(), 0);

        let outcome = pool.render(&mut state).unwrap();
        match outcome {
            FrameOutcome::Rendered { generation, .. } => assert_eq!(generation, 1),
            FrameOutcome::Unchanged => panic!("dirty frame was not rendered"),
        }
        assert_eq!(pool.completed_count(), 20);
        assert!(!state.is_dirty());
        assert!(pool.snapshot().pixels.iter().all(|&p| p == 1));
        pool.shutdown();
    }

    #[test]
    fn clean_view_is_a_no_op() {
        let mut pool = RenderPool::spawn(&context(16, 8, 2, 2), Stamp).unwrap();
        let mut state = ViewState::default();
        pool.render(&mut state).unwrap();
        let before = pool.snapshot().pixels.to_vec();

        assert_eq!(pool.render(&mut state).unwrap(), FrameOutcome::Unchanged);
        assert_eq!(pool.generation(), 1);
        assert_eq!(pool.completed_count(), 4);
        assert_eq!(pool.snapshot().pixels, &before[..]);
    }

    #[test]
    fn dead_worker_fails_the_frame() {
        let mut pool = RenderPool::spawn(&context(10, 10, 2, 1), PanicsOnRow(7)).unwrap();
        let mut state = ViewState::default();
        match pool.render(&mut state) {
            Err(RenderError::WorkerLost { owner, generation }) => {
                assert_eq!(owner, 1);
                assert_eq!(generation, 1);
            }
            other => panic!("expected a lost worker, got {:?}", other),
        }
        assert!(state.is_dirty());
        let snapshot = pool.snapshot();
        assert_eq!(snapshot.generation, 0);
        assert!(snapshot.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn broken_pool_dispatches_nothing() {
        let mut pool = RenderPool::spawn(&context(10, 10, 2, 1), PanicsOnRow(7)).unwrap();
        let mut state = ViewState::default();
        assert!(pool.render(&mut state).is_err());
        // Let the surviving worker's report land in the channel.
        thread::sleep(Duration::from_millis(50));

        for _ in 0..10 {
            match pool.render(&mut state) {
                Err(RenderError::WorkerLost { owner, generation }) => {
                    assert_eq!(owner, 1);
                    assert_eq!(generation, 1);
                }
                other => panic!("expected a lost worker, got {:?}", other),
            }
        }
        assert_eq!(pool.generation(), 1);
        assert!(pool.reports.is_empty());
        assert!(pool.snapshot().pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn lone_worker_death_is_a_lost_worker() {
        let mut pool = RenderPool::spawn(&context(4, 4, 1, 1), PanicsOnRow(0)).unwrap();
        let mut state = ViewState::default();
        match pool.render(&mut state) {
            Err(RenderError::WorkerLost { owner, generation }) => {
                assert_eq!(owner, 0);
                assert_eq!(generation, 1);
            }
            other => panic!("expected a lost worker, got {:?}", other),
        }
    }

    #[test]
    fn stale_and_duplicate_reports_are_not_counted() {
        let mut pool = RenderPool::spawn(&context(16, 8, 2, 2), Stamp).unwrap();
        let mut state = ViewState::default();
        pool.render(&mut state).unwrap();
        assert_eq!(pool.completed_count(), 4);
        let area = pool.workers[0].tile.bounds.area();

        pool.accept(Report {
            generation: 0,
            owner: 0,
            pixels: vec![7; area],
        });
        assert_eq!(pool.completed_count(), 4);

        pool.accept(Report {
            generation: 1,
            owner: 0,
            pixels: vec![9; area],
        });
        assert_eq!(pool.completed_count(), 4);
        assert_eq!(pool.workers[0].buffer, Some(vec![1; area]));

        // The next frame counts from zero again.
        state.mark_dirty();
        pool.render(&mut state).unwrap();
        assert_eq!(pool.completed_count(), 4);
        assert!(pool.snapshot().pixels.iter().all(|&p| p == 2));
    }
}
