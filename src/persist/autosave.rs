//! Debounced persistence.
//!
//! Snapshots are handed to a background task over a channel. Each new
//! snapshot restarts the wait, so a burst of edits is written once, after
//! the edits pause.

use super::Persister;
use crate::state::{StoreState, Subscriber};
use log::*;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub struct Autosaver {
    sender: UnboundedSender<StoreState>,
    task: JoinHandle<()>,
}

impl Autosaver {
    /// Start the background task. Must be called from within a tokio
    /// runtime.
    ///
    pub fn spawn(persister: Persister, delay: Duration) -> Autosaver {
        let (sender, receiver) = mpsc::unbounded_channel();
        debug!("Starting autosaver with a {:?} delay", delay);
        let task = tokio::spawn(run(persister, delay, receiver));
        Autosaver { sender, task }
    }

    /// Queue a snapshot, replacing any snapshot still waiting to be written.
    ///
    pub fn schedule(&self, state: StoreState) {
        if self.sender.send(state).is_err() {
            warn!("Autosaver has stopped; snapshot not persisted");
        }
    }

    /// Return a store subscriber that feeds this autosaver.
    ///
    pub fn subscriber(&self) -> AutosaveSubscriber {
        AutosaveSubscriber {
            sender: self.sender.clone(),
        }
    }

    /// Write any pending snapshot immediately and stop the task. Every
    /// subscriber handed out must be dropped first, or this waits for them.
    ///
    pub async fn flush(self) {
        drop(self.sender);
        if let Err(e) = self.task.await {
            error!("Autosaver task failed: {}", e);
        }
    }
}

/// Store subscriber that forwards cloned snapshots to an `Autosaver`.
///
pub struct AutosaveSubscriber {
    sender: UnboundedSender<StoreState>,
}

impl Subscriber for AutosaveSubscriber {
    fn notify(&mut self, state: &StoreState) {
        if self.sender.send(state.clone()).is_err() {
            warn!("Autosaver has stopped; snapshot not persisted");
        }
    }
}

fn persist(persister: &Persister, state: &StoreState) {
    if let Err(e) = persister.save(state) {
        error!("Autosave failed: {}", e);
    }
}

async fn run(persister: Persister, delay: Duration, mut receiver: UnboundedReceiver<StoreState>) {
    let mut pending: Option<StoreState> = None;
    loop {
        match pending.take() {
            None => match receiver.recv().await {
                Some(state) => pending = Some(state),
                None => break,
            },
            Some(state) => {
                tokio::select! {
                    next = receiver.recv() => match next {
                        Some(newer) => {
                            trace!("Autosave timer reset by newer snapshot");
                            pending = Some(newer);
                        }
                        None => {
                            persist(&persister, &state);
                            break;
                        }
                    },
                    _ = tokio::time::sleep(delay) => persist(&persister, &state),
                }
            }
        }
    }
    debug!("Autosaver stopped");
}
