use super::{LoopCtx, ModeLoop, Step};
use crate::frame::LineRead;
use crate::sock::LinkWrapper;
use std::io;

/// Longest RAW line accepted in one read. Longer input arrives in pieces.
pub const RAW_IN_LINE_LIMIT: usize = 128;

/// Receives `*...;` frames from the RAW output port.
pub struct RawInLoop;

impl ModeLoop for RawInLoop {
    fn step(&mut self, link: &mut LinkWrapper, ctx: &mut LoopCtx<'_>) -> io::Result<Step> {
        match link.read_line(RAW_IN_LINE_LIMIT)? {
            LineRead::Line(data) => {
                ctx.journal.log(&String::from_utf8_lossy(&data));
                ctx.count(data.len());
                ctx.pause();
                Ok(Step::Continue)
            }
            LineRead::Idle => {
                ctx.pause();
                Ok(Step::Continue)
            }
            LineRead::Closed => {
                ctx.journal.log("Connection gone.");
                Ok(Step::Quit)
            }
        }
    }
}
