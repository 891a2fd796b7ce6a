// The interactive state machine: {Idle, Writing} over discrete input events.
//
// This used to be the kind of logic that lives inline in a window loop with
// ambient globals; here it owns its canvas and stroke explicitly and consumes
// `InputEvent`s, so the whole flow runs in tests from synthetic sequences.

use tracing::{info, warn};

use crate::draw::fill_disc;
use crate::infer::{Classifier, Prediction, predict};
use crate::normalize::{NormalizedImage, normalize_region};
use crate::types::{BoundingBox, FrameBuffer, InputEvent, Stroke};

pub const CANVAS_WIDTH: usize = 640;
pub const CANVAS_HEIGHT: usize = 480;

/// Black background, white ink: the polarity the classifier was trained on.
pub const BACKGROUND: u32 = 0x0000_0000;
pub const INK: u32 = 0x00FF_FFFF;

/// Brush stamp radius in pixels; thick enough to survive the downscale to 28.
pub const BRUSH_RADIUS: i32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Writing,
}

/// What gets rendered over the canvas after a completed stroke.
#[derive(Clone, Copy, Debug)]
pub struct Overlay {
    pub prediction: Prediction,
    pub bounds: BoundingBox,
}

pub struct Session<C> {
    classifier: C,
    canvas: FrameBuffer,
    stroke: Stroke,
    phase: Phase,
    overlay: Option<Overlay>,
    last_input: Option<NormalizedImage>,
    running: bool,
}

impl<C: Classifier> Session<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            canvas: FrameBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND),
            stroke: Stroke::new(),
            phase: Phase::Idle,
            overlay: None,
            last_input: None,
            running: true,
        }
    }

    /// Drain one event completely before the next; there is exactly one
    /// thread of control, so the inference call inside pointer-up simply
    /// blocks the loop for its (small) duration.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.phase = Phase::Writing;
                self.stroke.begin();
                self.stamp(x, y);
            }
            InputEvent::PointerMove { x, y } => {
                self.stamp(x, y);
            }
            InputEvent::PointerUp => {
                self.phase = Phase::Idle;
                let points = self.stroke.end();
                // A click without movement records no points: no inference.
                if let Some(bounds) = BoundingBox::around(&points) {
                    self.finish_stroke(bounds);
                }
            }
            InputEvent::Clear => {
                self.phase = Phase::Idle;
                self.canvas.clear(BACKGROUND);
                self.stroke.reset();
                self.overlay = None;
                self.last_input = None;
            }
            InputEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Record the sample and give immediate ink feedback on the canvas.
    /// Appends are no-ops outside the writing state, so stray move events
    /// while idle leave no marks.
    fn stamp(&mut self, x: i32, y: i32) {
        if self.stroke.append(x, y) {
            fill_disc(&mut self.canvas, x, y, BRUSH_RADIUS, INK);
        }
    }

    /// Normalize the finished stroke's region and ask the classifier.
    /// A failed call loses this one prediction, never the session; the old
    /// overlay is dropped either way so a stale label is never shown.
    fn finish_stroke(&mut self, bounds: BoundingBox) {
        let image = normalize_region(&self.canvas, &bounds);
        match predict(&self.classifier, &image) {
            Ok(prediction) => {
                info!(
                    label = prediction.label,
                    confidence = prediction.confidence,
                    "stroke classified"
                );
                self.overlay = Some(Overlay { prediction, bounds });
                self.last_input = Some(image);
            }
            Err(error) => {
                warn!(%error, "prediction failed, keeping the session alive");
                self.overlay = None;
                self.last_input = None;
            }
        }
    }

    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// The normalized image behind the current overlay, surrendered once
    /// (used by the optional debug dump).
    pub fn take_last_input(&mut self) -> Option<NormalizedImage> {
        self.last_input.take()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
