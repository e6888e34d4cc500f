use super::{LoopCtx, ModeLoop, Step};
use crate::frame::LineRead;
use crate::sock::LinkWrapper;
use std::io;

const SBS_LINE_LIMIT: usize = 4096;

/// Receives `MSG,...` lines from the SBS (BaseStation) port.
pub struct SbsLoop;

impl ModeLoop for SbsLoop {
    fn step(&mut self, link: &mut LinkWrapper, ctx: &mut LoopCtx<'_>) -> io::Result<Step> {
        match link.read_line(SBS_LINE_LIMIT)? {
            LineRead::Line(data) => {
                ctx.journal.log(&String::from_utf8_lossy(&data));
                ctx.count(data.len());
                ctx.pause();
                Ok(Step::Continue)
            }
            // Behaves like a blocking read: poll again right away
            LineRead::Idle => Ok(Step::Continue),
            LineRead::Closed => {
                ctx.journal.log("Connection gone.");
                Ok(Step::Quit)
            }
        }
    }
}
