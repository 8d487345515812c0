//! Machine-readable output: one JSON object per line.
//!
//! Used by `carousel simulate --json` so rotation timelines can be diffed or
//! fed to other tools. Frames and events share the stream and are told apart
//! by their `"type"` field.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use super::{Frame, Layers, SlideRenderer};
use crate::carousel::{BlendStyle, CarouselEvent, Snapshot};

#[derive(Serialize)]
struct FrameRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    at_ms: u64,
    carousel: &'a str,
    blend: BlendStyle,
    #[serde(flatten)]
    snapshot: Snapshot,
    foreground: &'a str,
    background: &'a str,
    layers: Layers,
}

#[derive(Serialize)]
struct ClearRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    at_ms: u64,
    carousel: &'a str,
}

#[derive(Serialize)]
struct EventRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    carousel: &'a str,
    #[serde(flatten)]
    event: &'a CarouselEvent,
}

/// Writes frames and events as JSON lines. Works for any slide payload.
pub struct JsonRenderer<W: Write> {
    out: W,
    at_ms: u64,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, at_ms: 0 }
    }

    /// Timestamp stamped on the frames that follow.
    pub fn set_time(&mut self, at_ms: u64) {
        self.at_ms = at_ms;
    }

    pub fn write_event(&mut self, carousel: &str, event: &CarouselEvent) -> Result<()> {
        self.write_line(&EventRecord {
            kind: "event",
            carousel,
            event,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<P, W: Write> SlideRenderer<P> for JsonRenderer<W> {
    fn render(&mut self, name: &str, frame: &Frame<'_, P>) -> Result<()> {
        let record = FrameRecord {
            kind: "frame",
            at_ms: self.at_ms,
            carousel: name,
            blend: frame.blend,
            snapshot: frame.snapshot,
            foreground: &frame.foreground.id,
            background: &frame.background.id,
            layers: frame.layers,
        };
        self.write_line(&record)
    }

    fn clear(&mut self, name: &str) -> Result<()> {
        let record = ClearRecord {
            kind: "empty",
            at_ms: self.at_ms,
            carousel: name,
        };
        self.write_line(&record)
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Phase, Slide, SlideSet};
    use serde_json::Value;

    fn lines(bytes: Vec<u8>) -> Vec<Value> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_frame_record_fields() {
        let slides: SlideSet<u8> = vec![Slide::new("a", 1), Slide::new("b", 2)].into();
        let snapshot = Snapshot {
            current_index: 0,
            next_index: 1,
            phase: Phase::Transitioning,
            progress: 0.25,
        };
        let frame = Frame::capture(snapshot, BlendStyle::Crossfade, &slides).unwrap();

        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.set_time(4250);
        renderer.render("hero", &frame).unwrap();
        SlideRenderer::<u8>::clear(&mut renderer, "rail").unwrap();

        let records = lines(renderer.into_inner());
        assert_eq!(records[0]["type"], "frame");
        assert_eq!(records[0]["at_ms"], 4250);
        assert_eq!(records[0]["carousel"], "hero");
        assert_eq!(records[0]["blend"], "crossfade");
        assert_eq!(records[0]["phase"], "transitioning");
        assert_eq!(records[0]["foreground"], "a");
        assert_eq!(records[0]["background"], "b");
        assert_eq!(records[0]["layers"]["foreground"]["opacity"], 0.75);
        assert_eq!(records[1]["type"], "empty");
        assert_eq!(records[1]["carousel"], "rail");
    }

    #[test]
    fn test_event_record_is_flattened() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer
            .write_event(
                "hero",
                &CarouselEvent::Advanced {
                    current: 1,
                    next: 2,
                    at_ms: 5000,
                },
            )
            .unwrap();

        let records = lines(renderer.into_inner());
        assert_eq!(records[0]["type"], "event");
        assert_eq!(records[0]["event"], "advanced");
        assert_eq!(records[0]["current"], 1);
        assert_eq!(records[0]["at_ms"], 5000);
    }
}
