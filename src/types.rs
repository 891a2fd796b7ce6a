// Core types shared by the session, the drawing layer and the normalizer.

/// Margin added on every side of a stroke's tight bounding rectangle.
/// Compensates for brush thickness at the boundary; it also guarantees that
/// even a single-point stroke yields a box with a real area.
pub const BOX_MARGIN: i32 = 5;

/// One pointer sample in window pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Discrete input events the session consumes.
///
/// The window layer synthesizes these from minifb's polled state; tests feed
/// them directly, so the state machine never needs a real display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown { x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp,
    /// The clear command (`C` key): wipe the canvas and any in-progress stroke.
    Clear,
    /// Window close or ESC: leave the loop.
    Quit,
}

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // canvas width in pixels
    pub height: usize,     // canvas height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Allocate a canvas filled with `background`.
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width * height],
        }
    }

    /// Reset every pixel to `background` (the "clear canvas" command).
    pub fn clear(&mut self, background: u32) {
        for px in &mut self.pixels {
            *px = background;
        }
    }

    /// 8-bit luminance at (x, y); coordinates outside the canvas read as 0
    /// (background), so callers may sample a box that hangs over the edge.
    pub fn luminance_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 {
            return 0;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return 0;
        }
        let px = self.pixels[y * self.width + x];
        let r = ((px >> 16) & 0xFF) as f32;
        let g = ((px >> 8) & 0xFF) as f32;
        let b = (px & 0xFF) as f32;
        // Rec. 601 weights; for our white-on-black strokes this is 255 or 0.
        (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
    }
}

/// Collects pointer samples for one continuous drawing gesture.
///
/// `begin` / `append` / `end` mirror the pointer-down / move / up events:
/// points are only taken between `begin` and `end`, and `end` drains them so
/// the accumulator is ready for the next gesture.
#[derive(Default)]
pub struct Stroke {
    writing: bool,
    points: Vec<Point>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the writing state; points recorded from here on belong to one
    /// gesture.
    pub fn begin(&mut self) {
        self.writing = true;
    }

    /// Record a sample. A no-op outside the writing state; returns whether
    /// the point was taken so the caller knows to stamp visual feedback.
    pub fn append(&mut self, x: i32, y: i32) -> bool {
        if !self.writing {
            return false;
        }
        self.points.push(Point { x, y });
        true
    }

    /// Leave the writing state and hand back the gesture's points in drawing
    /// order. The accumulator is empty afterwards.
    pub fn end(&mut self) -> Vec<Point> {
        self.writing = false;
        std::mem::take(&mut self.points)
    }

    /// Drop any in-progress gesture (the clear command).
    pub fn reset(&mut self) {
        self.writing = false;
        self.points.clear();
    }

    pub fn is_writing(&self) -> bool {
        self.writing
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Margin-expanded rectangle around one completed stroke.
///
/// Deliberately not clamped to the canvas: the margin invariant must hold
/// even for strokes at the border, and the sampling layer treats
/// out-of-canvas pixels as background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Tight box around `points` grown by [`BOX_MARGIN`] on each side, or
    /// `None` when there are no points (pointer-up without movement).
    pub fn around(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min_x: min_x - BOX_MARGIN,
            min_y: min_y - BOX_MARGIN,
            max_x: max_x + BOX_MARGIN,
            max_y: max_y + BOX_MARGIN,
        })
    }

    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y) as u32
    }
}
