//! Live terminal preview: one status line per carousel, redrawn in place.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveToColumn, MoveUp, Show},
    execute, queue,
    terminal::{Clear, ClearType},
};
use std::io::Write;

use super::{Frame, SlideRenderer};
use crate::carousel::Phase;
use crate::constants::PROGRESS_BAR_WIDTH;
use crate::host::SlideContent;

/// Renders every carousel as a line and repaints the whole block on `flush`.
pub struct TerminalRenderer<W: Write> {
    out: W,
    lines: Vec<String>,
    painted: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines: Vec::new(),
            painted: 0,
        }
    }

    /// Forget the painted block so the next flush starts on a new line
    /// instead of overwriting whatever was printed since.
    pub fn detach(&mut self) {
        self.painted = 0;
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SlideRenderer<SlideContent> for TerminalRenderer<W> {
    fn render(&mut self, name: &str, frame: &Frame<'_, SlideContent>) -> Result<()> {
        self.lines.push(format_line(name, frame));
        Ok(())
    }

    fn clear(&mut self, name: &str) -> Result<()> {
        self.lines.push(format!("{name:<16} [empty]"));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.painted > 0 {
            queue!(self.out, MoveUp(self.painted as u16), MoveToColumn(0))?;
        }
        self.painted = 0;
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        for line in self.lines.drain(..) {
            write!(self.out, "{line}\r\n")?;
            self.painted += 1;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Hides the cursor for the lifetime of the preview.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        execute!(std::io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), Show);
    }
}

/// One status line: name, phase or blend bar, then the slide(s) on screen.
pub fn format_line(name: &str, frame: &Frame<'_, SlideContent>) -> String {
    let status = match frame.snapshot.phase {
        Phase::Transitioning => format!(
            "{} {} {:>3}%",
            frame.blend.as_str(),
            progress_bar(frame.snapshot.progress),
            (frame.snapshot.progress * 100.0).round() as u32
        ),
        phase => phase.as_str().to_string(),
    };

    let shown = describe(&frame.foreground.payload);
    let content = if frame.snapshot.phase == Phase::Static {
        shown
    } else {
        format!("{shown} -> {}", describe(&frame.background.payload))
    };

    format!("{name:<16} [{status}] {content}")
}

fn describe(slide: &SlideContent) -> String {
    match &slide.cta {
        Some(cta) => format!("{} ({cta})", slide.title),
        None => slide.title.clone(),
    }
}

fn progress_bar(progress: f32) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * PROGRESS_BAR_WIDTH as f32).round() as usize)
        .min(PROGRESS_BAR_WIDTH);
    format!(
        "{}{}",
        "▓".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}
