mod session_rng;

pub mod tron;

pub use session_rng::SessionRng;
