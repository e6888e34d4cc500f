use super::{LoopCtx, ModeLoop, Step};
use crate::frame::RawFrame;
use crate::sock::LinkWrapper;
use std::io;

/// Plays a receiver feed: pushes the same RAW frame every interval.
pub struct RawOutLoop {
    frame: RawFrame,
    wire: Vec<u8>,
}

impl RawOutLoop {
    pub fn new(frame: RawFrame) -> Self {
        let wire = frame.to_wire();
        Self { frame, wire }
    }
}

impl ModeLoop for RawOutLoop {
    fn step(&mut self, link: &mut LinkWrapper, ctx: &mut LoopCtx<'_>) -> io::Result<Step> {
        ctx.journal
            .log(&format!("Sending RAW message: {}.", self.frame));
        link.write_all(&self.wire)?;
        ctx.count(self.wire.len());
        ctx.pause();
        Ok(Step::Continue)
    }
}
