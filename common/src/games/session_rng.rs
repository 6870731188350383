use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Owned, seedable randomness for spawns and bot jitter. A round never touches a
/// global generator, so a fixed seed reproduces the same spawns and decisions.
#[derive(Clone, Debug)]
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Child generator with a seed drawn from this one.
    pub fn fork(&mut self) -> SessionRng {
        let seed: u64 = self.rng.random();
        SessionRng::new(seed)
    }

    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }
}
