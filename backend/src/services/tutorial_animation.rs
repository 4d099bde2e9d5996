//! Real-time tutorial marker.
//!
//! A background tokio task ticks at a fixed frame interval and publishes the
//! marker position for the elapsed wall-clock time on a `watch` channel.
//! Subscribers always see the latest frame; slow readers skip frames.

use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::synthesis::{SynthesisError, SynthesisResult, TutorialCurve, TutorialMarker};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(50);

pub struct TutorialAnimation {
    curve: TutorialCurve,
    frame_interval: Duration,
    sender: Arc<watch::Sender<TutorialMarker>>,
    task: Option<JoinHandle<()>>,
}

impl TutorialAnimation {
    /// Start animating `curve`. Must be called from within a tokio runtime.
    pub fn start(curve: TutorialCurve, frame_interval: Duration) -> SynthesisResult<Self> {
        curve.validate()?;
        if frame_interval.is_zero() {
            return Err(SynthesisError::invalid("frame_interval", "must be > 0"));
        }
        let (sender, _) = watch::channel(curve.marker_at(Duration::ZERO));
        let mut animation = Self {
            curve,
            frame_interval,
            sender: Arc::new(sender),
            task: None,
        };
        animation.spawn();
        Ok(animation)
    }

    pub fn curve(&self) -> &TutorialCurve {
        &self.curve
    }

    pub fn subscribe(&self) -> watch::Receiver<TutorialMarker> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> TutorialMarker {
        *self.sender.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Replace the animated curve; the sweep starts over from zero.
    pub fn restart(&mut self, curve: TutorialCurve) -> SynthesisResult<()> {
        curve.validate()?;
        self.stop();
        self.curve = curve;
        self.sender.send_replace(curve.marker_at(Duration::ZERO));
        self.spawn();
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Tutorial animation stopped");
        }
    }

    fn spawn(&mut self) {
        let sender = Arc::clone(&self.sender);
        let curve = self.curve;
        let frame_interval = self.frame_interval;
        self.task = Some(tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                sender.send_replace(curve.marker_at(started.elapsed()));
            }
        }));
    }
}

impl Drop for TutorialAnimation {
    fn drop(&mut self) {
        self.stop();
    }
}
