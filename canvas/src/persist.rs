//! Save hand-off between the engine and whatever persists frames.
//!
//! The engine only tracks whether a save is pending. A host supplies a
//! [`FrameSink`] and calls [`flush_save`]; the flag is cleared only after the
//! sink accepted the frame.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::convert::Infallible;

use tracing::{info, warn};

use crate::engine::EngineCore;
use crate::event::Event;
use crate::render::Frame;

/// Destination for saved frames (a file writer, an upload, a test buffer).
pub trait FrameSink {
    type Error;

    /// Persist one frame.
    ///
    /// # Errors
    ///
    /// Implementation-defined; a failed write leaves the save pending.
    fn write_frame(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

/// Render and hand over a frame if a save is pending.
///
/// Returns the events emitted (empty when nothing was pending).
///
/// # Errors
///
/// Returns the sink's error; the save request stays pending.
pub fn flush_save<S: FrameSink>(core: &mut EngineCore, sink: &mut S) -> Result<Vec<Event>, S::Error> {
    if !core.save_requested() {
        return Ok(Vec::new());
    }
    let frame = core.render();
    match sink.write_frame(&frame) {
        Ok(()) => {
            info!(width = frame.width(), height = frame.height(), "frame saved");
            Ok(core.complete_save())
        }
        Err(e) => {
            warn!("frame sink failed; save stays pending");
            Err(e)
        }
    }
}

/// Keeps every saved frame in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub frames: Vec<Frame>,
}

impl FrameSink for MemorySink {
    type Error = Infallible;

    fn write_frame(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
