use crate::charset::CharacterPool;
use crate::config::GenerationConfig;
use crate::error::ConfigError;
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use zeroize::Zeroizing;

const KEYSTREAM_BUFFER_LEN: usize = 1024;

/// Uniform integer source used for every draw the generator makes.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `[0, upper)`. `upper` is never zero.
    fn below(&mut self, upper: usize) -> usize;
}

/// ChaCha20 keystream with unbiased rejection sampling.
pub struct ChaChaSource {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl ChaChaSource {
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut cipher = ChaCha20::new(seed.into(), &[0u8; 12].into());
        let mut buffer = Zeroizing::new(vec![0u8; KEYSTREAM_BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    pub fn from_entropy() -> Self {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut *seed);
        Self::from_seed(&seed)
    }

    fn next_u64(&mut self) -> u64 {
        if self.pos + 8 > self.buffer.len() {
            self.buffer.fill(0);
            self.cipher.apply_keystream(&mut self.buffer);
            self.pos = 0;
        }

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.buffer[self.pos..self.pos + 8]);
        self.pos += 8;

        u64::from_le_bytes(bytes)
    }
}

impl RandomSource for ChaChaSource {
    fn below(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }

        let range = upper as u128;
        let rejection_threshold = (1u128 << 64) - ((1u128 << 64) % range);

        loop {
            let random_u64 = self.next_u64() as u128;
            if random_u64 < rejection_threshold {
                return (random_u64 % range) as usize;
            }
        }
    }
}

/// Adapter for any `rand` generator.
pub struct RngSource<R>(pub R);

impl<R: RngCore> RandomSource for RngSource<R> {
    fn below(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }
}

fn choose<R: RandomSource + ?Sized>(rng: &mut R, chars: &[char]) -> char {
    chars[rng.below(chars.len())]
}

pub fn generate_password<R: RandomSource + ?Sized>(
    pool: &CharacterPool,
    length: usize,
    rng: &mut R,
) -> Result<Zeroizing<String>, ConfigError> {
    if length == 0 {
        return Err(ConfigError::ZeroLength);
    }

    let sampling_pool = pool.sampling_pool();
    let mut chars: Zeroizing<Vec<char>> = Zeroizing::new(
        (0..length)
            .map(|_| choose(rng, sampling_pool))
            .collect(),
    );

    // A later repair may land on an earlier one's position.
    for (category, alphabet) in pool.categories() {
        if chars.iter().any(|c| alphabet.contains(c)) {
            continue;
        }

        let index = rng.below(length);
        chars[index] = choose(rng, alphabet);
        log::debug!("Inserted missing {} character", category);
    }

    Ok(Zeroizing::new(chars.iter().collect()))
}

pub fn generate<R: RandomSource + ?Sized>(
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<Zeroizing<String>, ConfigError> {
    let pool = CharacterPool::build(config)?;
    generate_password(&pool, config.length, rng)
}
