//! UpdateQueueHandle - public API for the update queue
//!
//! Fire-and-forget methods for the per-frame path, async methods with oneshot
//! channels for queries.

use tokio::sync::{mpsc, oneshot};

use super::commands::{CursorCommand, SubscriberFn};
use crate::config::FocusSquareConfig;
use crate::cursor::CursorSnapshot;
use crate::renderer::Renderer;
use crate::types::{CursorState, Sample};

/// Handle for interacting with the update queue
///
/// Cloning is cheap; every clone feeds the same worker.
#[derive(Clone)]
pub struct UpdateQueueHandle {
    cmd_tx: mpsc::UnboundedSender<CursorCommand>,
}

impl UpdateQueueHandle {
    pub fn new(cmd_tx: mpsc::UnboundedSender<CursorCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Spawn a new update queue and return a handle
    ///
    /// Convenience wrapper around `UpdateQueue::spawn`.
    pub fn spawn(config: FocusSquareConfig, renderer: impl Renderer) -> Self {
        super::actor::UpdateQueue::spawn(config, renderer)
    }

    // =========================================================================
    // Per-frame methods
    // =========================================================================

    /// Queue a tracking update without waiting for the result
    pub fn submit_tick(&self, sample: Sample) {
        let _ = self.cmd_tx.send(CursorCommand::Tick {
            sample,
            response: None,
        });
    }

    /// Process a tracking update and return the resulting cursor state
    ///
    /// Returns `None` if the cursor is retired or the queue is gone.
    pub async fn tick(&self, sample: Sample) -> Option<CursorState> {
        let (response_tx, response_rx) = oneshot::channel();
        let cmd = CursorCommand::Tick {
            sample,
            response: Some(response_tx),
        };

        if self.cmd_tx.send(cmd).is_err() {
            return None;
        }

        response_rx.await.ok().flatten()
    }

    // =========================================================================
    // Lifecycle methods
    // =========================================================================

    /// Discard the cursor and start over (session restart or new map)
    pub fn reset(&self) {
        let _ = self.cmd_tx.send(CursorCommand::Reset);
    }

    /// Remove the cursor after content has been placed
    pub fn retire(&self) {
        let _ = self.cmd_tx.send(CursorCommand::Retire);
    }

    pub fn hide(&self) {
        let _ = self.cmd_tx.send(CursorCommand::SetVisible { visible: false });
    }

    pub fn unhide(&self) {
        let _ = self.cmd_tx.send(CursorCommand::SetVisible { visible: true });
    }

    // =========================================================================
    // Query methods
    // =========================================================================

    /// Current cursor internals, `None` if retired
    pub async fn snapshot(&self) -> Option<CursorSnapshot> {
        let (response_tx, response_rx) = oneshot::channel();

        if self
            .cmd_tx
            .send(CursorCommand::Snapshot {
                response: response_tx,
            })
            .is_err()
        {
            return None;
        }

        response_rx.await.ok().flatten()
    }

    /// Register a listener for every published cursor state
    pub async fn subscribe(&self, listener: SubscriberFn) -> Option<usize> {
        let (response_tx, response_rx) = oneshot::channel();

        if self
            .cmd_tx
            .send(CursorCommand::Subscribe {
                listener,
                response: response_tx,
            })
            .is_err()
        {
            return None;
        }

        response_rx.await.ok()
    }

    /// Check if the worker is still alive
    pub fn is_alive(&self) -> bool {
        !self.cmd_tx.is_closed()
    }

    /// Signal the worker to shut down
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(CursorCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{AnimationCompletion, OrientationAnimation};
    use crate::types::{CameraPose, HitKind, HitResult, PlaneAlignment, PlaneAnchor, PlaneAnchorId, TrackingPhase};
    use glam::{Mat4, Vec3};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recording {
        applied: Vec<CursorState>,
        animations: Vec<OrientationAnimation>,
        completions: Vec<AnimationCompletion>,
        detached: bool,
    }

    #[derive(Clone, Default)]
    struct RecordingRenderer {
        recording: Arc<Mutex<Recording>>,
    }

    impl RecordingRenderer {
        fn take_completions(&self) -> Vec<AnimationCompletion> {
            std::mem::take(&mut self.recording.lock().unwrap().completions)
        }
    }

    impl Renderer for RecordingRenderer {
        fn apply(&mut self, state: &CursorState) {
            self.recording.lock().unwrap().applied.push(*state);
        }

        fn animate_orientation(&mut self, animation: OrientationAnimation, on_complete: AnimationCompletion) {
            let mut recording = self.recording.lock().unwrap();
            recording.animations.push(animation);
            recording.completions.push(on_complete);
        }

        fn detach(&mut self) {
            self.recording.lock().unwrap().detached = true;
        }
    }

    fn anchored_sample(alignment: PlaneAlignment) -> Sample {
        let kind = HitKind::PlaneAnchor(PlaneAnchor {
            id: PlaneAnchorId(1),
            alignment,
        });
        Sample::new(
            Some(HitResult::at(Vec3::new(0.0, -1.0, -1.0), kind)),
            Some(CameraPose::new(Vec3::ZERO, Mat4::IDENTITY)),
            true,
        )
    }

    #[test]
    fn test_handle_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<UpdateQueueHandle>();
    }

    #[tokio::test]
    async fn test_is_alive_when_channel_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = UpdateQueueHandle::new(tx);
        assert!(!handle.is_alive());
        assert_eq!(handle.tick(Sample::lost()).await, None);
    }

    #[tokio::test]
    async fn test_spawn_applies_billboard() {
        let renderer = RecordingRenderer::default();
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), renderer.clone());

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, TrackingPhase::Initializing);
        assert_eq!(
            renderer.recording.lock().unwrap().applied.first().copied(),
            Some(CursorState::billboard(0.8))
        );
    }

    #[tokio::test]
    async fn test_tick_runs_pipeline() {
        let renderer = RecordingRenderer::default();
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), renderer.clone());

        let state = handle.tick(anchored_sample(PlaneAlignment::Horizontal)).await.unwrap();
        assert!(state.is_animating_alignment);
        assert_eq!(state.position, Vec3::new(0.0, -1.0, -1.0));

        let recording = renderer.recording.lock().unwrap();
        assert_eq!(recording.animations.len(), 1);
        assert_eq!(recording.applied.last().copied(), Some(state));
    }

    #[tokio::test]
    async fn test_completion_from_renderer_thread() {
        let renderer = RecordingRenderer::default();
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), renderer.clone());

        handle.tick(anchored_sample(PlaneAlignment::Horizontal)).await;

        // Gated while the animation runs
        let state = handle.tick(anchored_sample(PlaneAlignment::Vertical)).await.unwrap();
        assert!(state.is_animating_alignment);
        assert_eq!(handle.snapshot().await.unwrap().alignment, Some(PlaneAlignment::Horizontal));

        let completions = renderer.take_completions();
        assert_eq!(completions.len(), 1);
        std::thread::spawn(move || {
            for completion in completions {
                completion.complete();
            }
        })
        .join()
        .unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.state.is_animating_alignment);

        let state = handle.tick(anchored_sample(PlaneAlignment::Vertical)).await.unwrap();
        assert!(state.is_animating_alignment);
        assert_eq!(handle.snapshot().await.unwrap().alignment, Some(PlaneAlignment::Vertical));
    }

    #[tokio::test]
    async fn test_reset_ignores_stale_completion() {
        let renderer = RecordingRenderer::default();
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), renderer.clone());

        handle.tick(anchored_sample(PlaneAlignment::Horizontal)).await;
        let stale = renderer.take_completions();

        handle.reset();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, CursorState::billboard(0.8));
        assert_eq!(snapshot.alignment, None);

        handle.tick(anchored_sample(PlaneAlignment::Horizontal)).await;
        let current = renderer.take_completions();

        drop(stale);
        assert!(handle.snapshot().await.unwrap().state.is_animating_alignment);

        drop(current);
        assert!(!handle.snapshot().await.unwrap().state.is_animating_alignment);
    }

    #[tokio::test]
    async fn test_retire_until_reset() {
        let renderer = RecordingRenderer::default();
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), renderer.clone());

        handle.retire();
        assert_eq!(handle.tick(anchored_sample(PlaneAlignment::Horizontal)).await, None);
        assert!(handle.snapshot().await.is_none());
        assert!(renderer.recording.lock().unwrap().detached);

        handle.reset();
        assert!(handle.tick(anchored_sample(PlaneAlignment::Horizontal)).await.is_some());
    }

    #[tokio::test]
    async fn test_hide_and_unhide() {
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), RecordingRenderer::default());

        handle.hide();
        assert!(!handle.snapshot().await.unwrap().state.visible);

        handle.unhide();
        assert!(handle.snapshot().await.unwrap().state.visible);
    }

    #[tokio::test]
    async fn test_subscriber_sees_ticks() {
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), RecordingRenderer::default());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = handle
            .subscribe(Arc::new(move |state: &CursorState| {
                sink.lock().unwrap().push(*state);
            }))
            .await;
        assert_eq!(id, Some(0));

        handle.submit_tick(anchored_sample(PlaneAlignment::Horizontal));
        handle.submit_tick(Sample::lost());
        handle.snapshot().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], CursorState {
            is_animating_alignment: true,
            ..CursorState::billboard(0.8)
        });
    }

    #[tokio::test]
    async fn test_shutdown() {
        let handle = UpdateQueueHandle::spawn(FocusSquareConfig::default(), RecordingRenderer::default());
        handle.shutdown();
        assert_eq!(handle.tick(Sample::lost()).await, None);
        assert!(!handle.is_alive());
    }
}
