// End-to-end flow against the public API: synthetic pointer events through
// the session, a stub classifier behind the trait seam, no window involved.

use std::cell::RefCell;
use std::rc::Rc;

use digit_pad::error::Error;
use digit_pad::infer::{Classifier, DIGIT_CLASSES, DIGIT_NAMES};
use digit_pad::normalize::NormalizedImage;
use digit_pad::session::{BACKGROUND, Session};
use digit_pad::types::{BoundingBox, InputEvent};

/// Records every call and the inputs it saw; answers with a fixed class.
struct SpyClassifier {
    class: usize,
    seen: Rc<RefCell<Vec<NormalizedImage>>>,
}

impl Classifier for SpyClassifier {
    fn classify(&self, image: &NormalizedImage) -> Result<[f32; DIGIT_CLASSES], Error> {
        self.seen.borrow_mut().push(image.clone());
        let mut probs = [0.01; DIGIT_CLASSES];
        probs[self.class] = 0.91;
        Ok(probs)
    }
}

fn spy_session(class: usize) -> (Session<SpyClassifier>, Rc<RefCell<Vec<NormalizedImage>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let session = Session::new(SpyClassifier { class, seen: Rc::clone(&seen) });
    (session, seen)
}

#[test]
fn square_stroke_scenario() {
    let (mut session, seen) = spy_session(5);

    session.handle_event(InputEvent::PointerDown { x: 100, y: 100 });
    session.handle_event(InputEvent::PointerMove { x: 110, y: 100 });
    session.handle_event(InputEvent::PointerMove { x: 110, y: 110 });
    session.handle_event(InputEvent::PointerMove { x: 100, y: 110 });
    session.handle_event(InputEvent::PointerUp);

    // One inference, over the margin-expanded box.
    assert_eq!(seen.borrow().len(), 1);
    let overlay = session.overlay().expect("stroke was classified");
    assert_eq!(
        overlay.bounds,
        BoundingBox { min_x: 95, min_y: 95, max_x: 115, max_y: 115 }
    );

    // The classifier input is a 28x28 image with values in [0,1] and some
    // actual ink in it.
    let inputs = seen.borrow();
    let image = &inputs[0];
    assert_eq!(image.len(), 28 * 28);
    assert!(image.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
    assert!(image.as_slice().iter().any(|&v| v > 0.5));

    // The displayed label is one of the ten fixed names.
    assert!(DIGIT_NAMES.contains(&overlay.prediction.label));
    assert_eq!(overlay.prediction.label, "Five");
}

#[test]
fn pointer_up_without_stroke_is_a_no_op() {
    let (mut session, seen) = spy_session(0);
    session.handle_event(InputEvent::PointerUp);
    assert!(seen.borrow().is_empty());
    assert!(session.overlay().is_none());
    assert!(session.canvas().pixels.iter().all(|&p| p == BACKGROUND));
}

#[test]
fn clear_leaves_an_all_background_canvas() {
    let (mut session, _seen) = spy_session(2);

    session.handle_event(InputEvent::PointerDown { x: 300, y: 200 });
    session.handle_event(InputEvent::PointerMove { x: 320, y: 220 });
    session.handle_event(InputEvent::PointerUp);
    assert!(session.canvas().pixels.iter().any(|&p| p != BACKGROUND));

    session.handle_event(InputEvent::Clear);
    assert!(session.canvas().pixels.iter().all(|&p| p == BACKGROUND));
    assert!(session.overlay().is_none());
}

#[test]
fn drawing_near_the_border_never_panics() {
    let (mut session, seen) = spy_session(1);

    // Stroke hugging the top-left corner: the margin-expanded box hangs off
    // the canvas, the sampler reads those pixels as background.
    session.handle_event(InputEvent::PointerDown { x: 1, y: 1 });
    session.handle_event(InputEvent::PointerMove { x: 0, y: 4 });
    session.handle_event(InputEvent::PointerMove { x: 3, y: 0 });
    session.handle_event(InputEvent::PointerUp);

    assert_eq!(seen.borrow().len(), 1);
    let overlay = session.overlay().expect("border stroke was classified");
    assert!(overlay.bounds.min_x < 0);
    assert!(overlay.bounds.min_y < 0);
    let inputs = seen.borrow();
    assert!(inputs[0].as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn each_stroke_replaces_the_previous_overlay() {
    let (mut session, seen) = spy_session(8);

    session.handle_event(InputEvent::PointerDown { x: 100, y: 100 });
    session.handle_event(InputEvent::PointerMove { x: 130, y: 130 });
    session.handle_event(InputEvent::PointerUp);
    let first = session.overlay().unwrap().bounds;

    session.handle_event(InputEvent::PointerDown { x: 400, y: 300 });
    session.handle_event(InputEvent::PointerMove { x: 430, y: 330 });
    session.handle_event(InputEvent::PointerUp);
    let second = session.overlay().unwrap().bounds;

    assert_eq!(seen.borrow().len(), 2);
    assert_ne!(first, second);
}
