//! Scripted newsstand demo for the flip view controller.
//!
//! Drives a [`FlipView`] with a fixed-step clock and synthetic pointer
//! input, printing the window and render state after each interaction. Run
//! with `cargo run -p example`; set `RUST_LOG=flipview=debug` for the
//! controller's own tracing.

use std::time::{Duration, Instant};

use flipview::{
    FlipFrame, FlipView, FlipViewArgs, ItemPosition, OverFlipMode, PageProvider, PointerEvent,
    ProviderError, WindowPage,
};
use tracing::info;

const FRAME: Duration = Duration::from_millis(16);
const VIEW_WIDTH: f32 = 540.0;
const VIEW_HEIGHT: f32 = 960.0;

/// Article collection backing the demo pages.
struct Newsstand {
    headlines: Vec<&'static str>,
    live_pages: usize,
}

impl Newsstand {
    fn new() -> Self {
        Self {
            headlines: vec![
                "Harbor bridge reopens after decade of repairs",
                "City orchestra takes the season outdoors",
                "Night markets return to the riverfront",
                "Glasshouse botanists revive extinct tulip",
                "Local chess club crowns youngest champion",
                "Ferry line adds a dawn crossing",
                "Museum basement yields forgotten frescoes",
                "Lighthouse keepers pass the lamp after 40 years",
            ],
            live_pages: 0,
        }
    }
}

impl PageProvider for Newsstand {
    type Item = String;

    fn count(&self) -> usize {
        self.headlines.len()
    }

    fn position_of(&self, item: &String) -> ItemPosition {
        match self
            .headlines
            .iter()
            .position(|headline| *headline == item.as_str())
        {
            Some(index) => ItemPosition::At(index),
            None => ItemPosition::Removed,
        }
    }

    fn materialize(&mut self, position: usize) -> Result<String, ProviderError> {
        let headline = self
            .headlines
            .get(position)
            .ok_or_else(|| format!("no article at {position}"))?;
        self.live_pages += 1;
        Ok((*headline).to_string())
    }

    fn destroy(&mut self, _position: usize, _item: String) -> Result<(), ProviderError> {
        self.live_pages -= 1;
        Ok(())
    }
}

/// Deterministic stand-in for a frame scheduler.
struct Clock {
    now: Instant,
}

impl Clock {
    fn tick(&mut self) -> Instant {
        self.now += FRAME;
        self.now
    }
}

fn main() {
    init_tracing();

    let mut view = FlipView::new(FlipViewArgs::default().over_flip_mode(OverFlipMode::RubberBand));
    view.set_size(VIEW_WIDTH, VIEW_HEIGHT);
    view.set_on_page_settled(|page| info!(page, "flipped to page"));
    view.set_on_flip_state(|state| info!(?state, "flip state"));
    view.set_on_over_flip(|event| {
        info!(
            distance = event.distance,
            past_start = event.past_start,
            "over-flip"
        );
    });
    view.set_provider(Newsstand::new());
    let mut clock = Clock {
        now: Instant::now(),
    };

    describe("fresh stand", &view);

    view.flip_to(3).expect("page 3 exists");
    describe("flip_to(3)", &view);

    view.smooth_flip_to(6, clock.now).expect("page 6 exists");
    watch_one_flip(&mut view, &mut clock);
    describe("smooth_flip_to(6)", &view);

    // a quick upward swipe flings to the next page
    swipe(&mut view, &mut clock, 700.0, 250.0, 5);
    describe("fling forward", &view);

    // already on the last page, so the rubber band gives and snaps back
    swipe(&mut view, &mut clock, 700.0, 250.0, 5);
    describe("over-drag at the end", &view);

    // a long downward swipe crosses the midpoint and flings back to page 6
    swipe(&mut view, &mut clock, 250.0, 800.0, 30);
    describe("drag back", &view);

    view.flip_to(2).expect("page 2 exists");
    assert!(view.peek_next(true, clock.now));
    run_until_idle(&mut view, &mut clock);
    describe("after a peek hint", &view);

    // drop the article before the current one; the view follows its page
    if let Some(stand) = view.provider_mut() {
        stand.headlines.remove(0);
    }
    view.data_set_changed();
    describe("front page retired", &view);

    if let Some(stand) = view.provider() {
        info!(live_pages = stand.live_pages, "demo done");
    }
}

/// Runs the animation to completion, reporting the first mid-flip frame.
fn watch_one_flip(view: &mut FlipView<Newsstand>, clock: &mut Clock) {
    let mut reported = false;
    while view.tick(clock.now) {
        if !reported
            && let FlipFrame::Flipping(cues) = view.frame()
            && cues.degrees > 0.0
        {
            info!(
                degrees = cues.degrees,
                over_leading = cues.flipping_over_leading,
                shadow = cues.shadow_alpha,
                "mid-flip frame"
            );
            reported = true;
        }
        clock.tick();
    }
}

fn run_until_idle(view: &mut FlipView<Newsstand>, clock: &mut Clock) {
    while view.tick(clock.now) {
        clock.tick();
    }
}

/// Feeds a straight vertical drag, one move per frame, then releases.
fn swipe(view: &mut FlipView<Newsstand>, clock: &mut Clock, from: f32, to: f32, steps: u32) {
    let x = VIEW_WIDTH / 2.0;
    view.handle_pointer_event(&PointerEvent::down(0, x, from), clock.now);
    for step in 1..=steps {
        let y = from + (to - from) * step as f32 / steps as f32;
        let now = clock.tick();
        view.handle_pointer_event(&PointerEvent::moved(0, x, y), now);
    }
    let now = clock.tick();
    view.handle_pointer_event(&PointerEvent::up(0, x, to), now);
    run_until_idle(view, clock);
}

fn describe(label: &str, view: &FlipView<Newsstand>) {
    let slot = |page: Option<&WindowPage<String>>| {
        page.map_or_else(
            || "(empty)".to_string(),
            |page| format!("#{} {}", page.position(), page.item()),
        )
    };
    println!(
        "{label:>24} | page {:?} at distance {:.1}",
        view.current_page(),
        view.flip_distance()
    );
    println!("{:>24} |   prev {}", "", slot(view.window().previous()));
    println!("{:>24} |   curr {}", "", slot(view.window().current()));
    println!("{:>24} |   next {}", "", slot(view.window().next()));
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,flipview=info,example=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}
