//! UpdateQueue - actor owning the focus square and the renderer
//!
//! The actor processes commands strictly in order, so the cursor has a single
//! writer without any lock. The renderer's animation completion signal is a
//! command like any other.

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::actor_handle::UpdateQueueHandle;
use super::commands::{CursorCommand, SubscriberFn};
use crate::config::FocusSquareConfig;
use crate::cursor::{CursorSnapshot, FocusSquare};
use crate::renderer::{AnimationCompletion, Renderer};
use crate::types::{CursorState, Sample};

/// Actor responsible for the lifetime of the cursor
///
/// ```text
/// pose source ──Tick──┐
/// controller ─Reset───┤     ┌──────────────────────────┐
/// renderer ─Finished──┼───▶ │ command_rx (unbounded)   │
///                     │     │  cursor: FocusSquare     │──apply/animate──▶ renderer
///                     │     │  generation: u64         │
///                     └──── └──────────────────────────┘
/// ```
pub struct UpdateQueue {
    config: FocusSquareConfig,

    /// `None` once retired
    cursor: Option<FocusSquare>,

    /// Bumped on every reset so completions from a discarded cursor are ignored
    generation: u64,

    renderer: Box<dyn Renderer>,

    subscribers: Vec<SubscriberFn>,

    command_rx: mpsc::UnboundedReceiver<CursorCommand>,

    /// Used to build completion tokens without keeping the channel open
    command_tx: mpsc::WeakUnboundedSender<CursorCommand>,

    tick_count: u64,
}

impl UpdateQueue {
    /// Spawn the queue worker and return a handle for interacting with it
    ///
    /// The renderer immediately receives the initial billboard state.
    pub fn spawn(config: FocusSquareConfig, renderer: impl Renderer) -> UpdateQueueHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let mut queue = UpdateQueue {
            cursor: Some(FocusSquare::new(config.clone())),
            config,
            generation: 0,
            renderer: Box::new(renderer),
            subscribers: Vec::new(),
            command_rx: cmd_rx,
            command_tx: cmd_tx.downgrade(),
            tick_count: 0,
        };

        if let Some(state) = queue.cursor.as_ref().map(FocusSquare::state) {
            queue.renderer.apply(&state);
        }

        tokio::spawn(queue.run());

        info!("Focus square update queue spawned");

        UpdateQueueHandle::new(cmd_tx)
    }

    /// Main run loop, until every handle is dropped or shutdown is requested
    async fn run(mut self) {
        debug!("Update queue run loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            trace!(?cmd, "Processing command");

            match cmd {
                CursorCommand::Tick { sample, response } => {
                    let result = self.handle_tick(&sample);
                    if let Some(response) = response {
                        let _ = response.send(result);
                    }
                }
                CursorCommand::AnimationFinished { generation } => {
                    self.handle_animation_finished(generation);
                }
                CursorCommand::Reset => {
                    self.handle_reset();
                }
                CursorCommand::Retire => {
                    if self.cursor.take().is_some() {
                        self.renderer.detach();
                        info!("Focus square retired");
                    }
                }
                CursorCommand::SetVisible { visible } => {
                    if let Some(cursor) = self.cursor.as_mut() {
                        let state = if visible { cursor.unhide() } else { cursor.hide() };
                        self.publish(&state);
                    }
                }
                CursorCommand::Snapshot { response } => {
                    let snapshot: Option<CursorSnapshot> = self.cursor.as_ref().map(FocusSquare::snapshot);
                    let _ = response.send(snapshot);
                }
                CursorCommand::Subscribe { listener, response } => {
                    self.subscribers.push(listener);
                    let id = self.subscribers.len() - 1;
                    let _ = response.send(id);
                    debug!(subscriber_id = id, "Added subscriber");
                }
                CursorCommand::Shutdown => {
                    info!("Update queue received shutdown command");
                    break;
                }
            }
        }

        info!(tick_count = self.tick_count, "Update queue run loop terminated");
    }

    fn handle_tick(&mut self, sample: &Sample) -> Option<CursorState> {
        let cursor = self.cursor.as_mut()?;
        let state = cursor.on_tick(sample);
        let animation = cursor.take_animation();
        let phase = cursor.phase();
        self.tick_count += 1;

        if let Some(animation) = animation {
            let completion = self.completion_token();
            self.renderer.animate_orientation(animation, completion);
        }

        trace!(
            ?phase,
            position = ?state.position,
            scale = state.scale,
            animating = state.is_animating_alignment,
            "Cursor updated"
        );

        self.publish(&state);
        Some(state)
    }

    fn handle_animation_finished(&mut self, generation: u64) {
        if generation != self.generation {
            trace!(generation, current = self.generation, "Ignoring stale animation completion");
            return;
        }
        if let Some(cursor) = self.cursor.as_mut() {
            let state = cursor.finish_alignment_animation();
            self.publish(&state);
        }
    }

    fn handle_reset(&mut self) {
        self.generation += 1;
        let cursor = FocusSquare::new(self.config.clone());
        let state = cursor.state();
        self.cursor = Some(cursor);

        info!(generation = self.generation, "Focus square reset");
        self.publish(&state);
    }

    /// Completion token that feeds back into this queue
    fn completion_token(&self) -> AnimationCompletion {
        let tx = self.command_tx.clone();
        let generation = self.generation;
        AnimationCompletion::new(move || {
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(CursorCommand::AnimationFinished { generation });
            }
        })
    }

    /// Push a state to the renderer and subscribers
    fn publish(&mut self, state: &CursorState) {
        self.renderer.apply(state);
        for subscriber in &self.subscribers {
            subscriber(state);
        }
    }
}
