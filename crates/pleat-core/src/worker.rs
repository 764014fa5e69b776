//! Background hand-pose estimation for native hosts.
//!
//! The worker thread pulls frames from a [`FrameSource`], runs them through a
//! [`HandPoseEstimator`] and pushes each new sample down a channel. The frame
//! loop keeps the receiving end. Dropping the [`EstimatorWorker`] stops the
//! thread and joins it, which drops the detector and the frame source (camera
//! stream) with it.

use crate::estimator::{CapturedFrame, HandPoseDetector, HandPoseEstimator};
use crate::hand::ControlSample;
use crate::sample::{sample_channel, SampleReceiver, SampleSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Supplier of camera frames. `None` means the stream has ended.
pub trait FrameSource {
    fn capture(&mut self) -> Option<CapturedFrame>;
}

/// Pixel-less frames stamped with a monotonic clock, for detectors that
/// acquire their own input.
pub struct ClockFrames {
    start: Instant,
}

impl ClockFrames {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for ClockFrames {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ClockFrames {
    fn capture(&mut self) -> Option<CapturedFrame> {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        Some(CapturedFrame::timestamp_only(ms))
    }
}

pub struct EstimatorWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EstimatorWorker {
    /// Start estimating on a dedicated thread, polling every `interval`.
    pub fn spawn<D, F>(
        detector: D,
        mut frames: F,
        interval: Duration,
    ) -> std::io::Result<(Self, SampleReceiver)>
    where
        D: HandPoseDetector + Send + 'static,
        F: FrameSource + Send + 'static,
    {
        let (tx, rx) = sample_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("hand-estimator".into())
            .spawn(move || {
                let mut estimator = HandPoseEstimator::new(detector);
                while !stop_flag.load(Ordering::Acquire) {
                    let Some(frame) = frames.capture() else {
                        log::info!("[estimator] frame source ended");
                        tx.push(ControlSample::UNTRACKED);
                        break;
                    };
                    if let Some(sample) = estimator.process(&frame.view(), frame.timestamp_ms) {
                        if !tx.push(sample) {
                            break;
                        }
                    }
                    thread::sleep(interval);
                }
                log::debug!("[estimator] worker stopped");
            })?;
        Ok((
            Self {
                stop,
                handle: Some(handle),
            },
            rx,
        ))
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it; also done on drop.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[estimator] worker panicked");
            }
        }
    }
}

impl Drop for EstimatorWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A running worker together with its receiving end. Attached to a session,
/// it ties the estimator's lifetime to the wall's.
pub struct WorkerSource {
    rx: SampleReceiver,
    worker: EstimatorWorker,
}

impl WorkerSource {
    pub fn spawn<D, F>(detector: D, frames: F, interval: Duration) -> std::io::Result<Self>
    where
        D: HandPoseDetector + Send + 'static,
        F: FrameSource + Send + 'static,
    {
        let (worker, rx) = EstimatorWorker::spawn(detector, frames, interval)?;
        Ok(Self { rx, worker })
    }

    pub fn worker(&self) -> &EstimatorWorker {
        &self.worker
    }
}

impl SampleSource for WorkerSource {
    fn latest(&mut self) -> ControlSample {
        self.rx.latest()
    }
}
