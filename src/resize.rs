//! Resize watcher: reports a surface's size whenever its width changes.
//!
//! The host calls [`ResizeWatcher::observe`] with the container width it sees
//! (for example once per frame). Height is fixed per chart, so only width
//! changes are reported. Dropping the watcher detaches it.

use crate::models::Dimensions;
use log::debug;
use std::sync::mpsc::{Receiver, Sender, channel};

#[derive(Debug)]
pub struct ResizeWatcher {
    height: u32,
    last_width: Option<u32>,
    tx: Option<Sender<Dimensions>>,
}

impl ResizeWatcher {
    /// A new watcher for a surface of fixed `height`, and the receiving end the pipeline drains.
    pub fn attach(height: u32) -> (Self, Receiver<Dimensions>) {
        let (tx, rx) = channel();
        (
            Self {
                height,
                last_width: None,
                tx: Some(tx),
            },
            rx,
        )
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_attached(&self) -> bool {
        self.tx.is_some()
    }

    /// Feed the observed container width. Returns `true` when a new size was reported.
    pub fn observe(&mut self, width: u32) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        if self.last_width == Some(width) {
            return false;
        }
        let dims = Dimensions::new(width, self.height);
        if tx.send(dims).is_err() {
            debug!("resize receiver gone; detaching watcher");
            self.tx = None;
            return false;
        }
        debug!("resize: {}x{}", dims.width, dims.height);
        self.last_width = Some(width);
        true
    }

    /// Stop reporting. Idempotent.
    pub fn detach(&mut self) {
        if self.tx.take().is_some() {
            debug!("resize watcher detached");
        }
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.detach();
    }
}
