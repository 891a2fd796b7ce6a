// What you SEE:
// • A black 640x480 canvas. Hold the left mouse button to draw in white ink.
// • Release the button: the stroke gets a bounding box and a predicted digit
//   name with its confidence, rendered right above the box.
// • C clears the canvas. ESC or closing the window quits.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use digit_pad::draw::{Drawer, draw_rect_outline, draw_text_5x7};
use digit_pad::error::Error;
use digit_pad::infer::DigitClassifier;
use digit_pad::session::{BACKGROUND, CANVAS_HEIGHT, CANVAS_WIDTH, Session};
use digit_pad::types::FrameBuffer;

const BOX_COLOR: u32 = 0x00FF_5050;
const LABEL_COLOR: u32 = 0x00FF_CC33;
const HUD_COLOR: u32 = 0x0090_9090;

#[derive(Parser, Debug)]
#[command(name = "digit-pad", about = "Draw a digit, release the mouse, get a prediction.")]
struct Args {
    /// Path to the trained classifier checkpoint (named MessagePack).
    #[arg(long, default_value = "model/mnist.mpk")]
    model: PathBuf,

    /// Save every normalized 28x28 crop as a PNG into this directory,
    /// to inspect what the classifier actually saw. Off by default.
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    /* --- Classifier first: a missing checkpoint aborts before any window
       shows up, with the offending path in the diagnostic. --- */
    let classifier = DigitClassifier::load(&args.model)?;
    info!(path = %args.model.display(), "classifier checkpoint loaded");

    if let Some(dir) = &args.dump_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %e, "cannot create dump directory, dumps disabled");
        }
    }

    let mut drawer = Drawer::new("Digit Pad", CANVAS_WIDTH, CANVAS_HEIGHT)?;
    let mut session = Session::new(classifier);

    /* --- Reusable screen buffer: the canvas plus per-frame overlays.
       The canvas itself stays clean so the next crop never picks up
       label or box pixels. --- */
    let mut screen = FrameBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);
    let mut dump_seq: u32 = 0;

    while session.is_running() {
        /* 1) Drain this frame's input into the state machine. One event is
           handled fully (inference included) before the next. */
        for event in drawer.poll_events() {
            session.handle_event(event);
        }

        /* 2) Optional debug dump of the freshly classified input. */
        if let Some(dir) = &args.dump_dir {
            if let Some(image) = session.take_last_input() {
                let path = dir.join(format!("crop_{dump_seq:04}.png"));
                match image.save_png(&path) {
                    Ok(()) => dump_seq += 1,
                    Err(e) => warn!(path = %path.display(), error = %e, "crop dump failed"),
                }
            }
        }

        /* 3) Compose: canvas below, overlays on top. */
        screen.pixels.copy_from_slice(&session.canvas().pixels);

        if let Some(overlay) = session.overlay() {
            let b = overlay.bounds;
            draw_rect_outline(&mut screen, b.min_x, b.min_y, b.max_x, b.max_y, BOX_COLOR);
            let text = format!(
                "{} {:.0}%",
                overlay.prediction.label,
                overlay.prediction.confidence * 100.0
            );
            // Anchor the label just above the box; clipped if off-screen.
            draw_text_5x7(&mut screen, b.min_x, b.min_y - 11, &text, LABEL_COLOR);
        }

        draw_text_5x7(&mut screen, 8, 8, "DRAW A DIGIT | C: CLEAR | ESC: QUIT", HUD_COLOR);

        /* 4) Present to the window. */
        drawer.present(&screen)?;
    }

    Ok(())
}
