use image::Rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lower bound for every color channel.
const CHANNEL_MIN: u8 = 100;

/// Produces one fill color per label, each RGB channel uniform in
/// `[100, 255]`.
#[derive(Debug)]
pub struct LabelPalette {
    rng: StdRng,
}

impl LabelPalette {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A palette with a fixed seed yields a reproducible color sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_color(&mut self) -> Rgb<u8> {
        Rgb([
            self.rng.random_range(CHANNEL_MIN..=u8::MAX),
            self.rng.random_range(CHANNEL_MIN..=u8::MAX),
            self.rng.random_range(CHANNEL_MIN..=u8::MAX),
        ])
    }
}

impl Default for LabelPalette {
    fn default() -> Self {
        Self::new()
    }
}
