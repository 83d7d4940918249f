//! Decorative waiting text shown while a run is in flight.

/// Strategy for producing a human-readable waiting line.
///
/// The text is cosmetic and carries no semantic state; implementations must
/// not influence control flow.
pub trait ProgressText: Send + Sync {
    fn waiting_line(&self) -> String;
}

/// Default strategy: a rotating pool of waiting quotes.
#[derive(Default)]
pub struct WaitingQuotes;

const QUOTES: &[&str] = &[
    "Brewing coffee...",
    "Diving deep into the data ocean...",
    "Aligning the digital constellations...",
    "Summoning insights from the ether...",
    "Just coaxing the information into existence...",
    "Spinning threads of thought...",
    "My circuits are currently composing a masterpiece...",
    "Waiting for the knowledge tree to bear fruit...",
    "Polishing the answer until it sparkles...",
    "Chasing down the perfect response...",
    "The digital gears are whirring harmoniously...",
    "Consulting with my inner muse...",
    "Just adding a sprinkle of digital magic...",
    "Gathering stardust to answer your query...",
    "My neural networks are having a pow-wow...",
    "Loading... please wait for the digital confetti...",
    "Forging the ultimate reply...",
    "In the grand theatre of algorithms...",
    "Shuffling the deck of possibilities...",
    "Almost ready to unveil the answer...",
    "Just persuading the pixels to cooperate...",
    "Warming up the thought engines...",
    "Sculpting the perfect response...",
    "Navigating the labyrinth of information...",
    "Attuning to the cosmic frequency of knowledge...",
    "Just persuading the data bits to line up...",
    "Waiting for inspiration to strike the silicon...",
    "Building your answer pixel by pixel...",
    "My digital cogs are turning... smoothly, I promise!",
    "Conjuring insights from the code cauldron...",
    "Just a moment while I consult the infinite library...",
    "Letting the algorithms dance...",
    "Preparing a response sprinkled with starlight...",
    "Deciphering the whispers of the web...",
    "Just organizing my thoughts into a neat little package...",
    "Waiting for the final piece of the puzzle...",
    "My internal hamsters are on a coffee break...",
    "Crafting a reply worthy of your query...",
    "Synchronizing the digital universe...",
    "Just waiting for the creative juices to flow... virtually, of course.",
    "Almost ready to emerge with the answer...",
];

impl WaitingQuotes {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressText for WaitingQuotes {
    fn waiting_line(&self) -> String {
        QUOTES[pick_index(QUOTES.len())].to_string()
    }
}

/// Pseudo-random index without pulling in the rand crate.
fn pick_index(len: usize) -> usize {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    (hasher.finish() % len as u64) as usize
}
