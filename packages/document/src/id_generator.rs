use crc32fast::Hasher;
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 4;

/// Derive a generator seed from the wall clock and a random word
pub fn session_seed() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();

    let mut hasher = Hasher::new();
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&rand::thread_rng().gen::<u64>().to_le_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Id source for sections, columns and blocks.
///
/// Owned by one editing session. Ids combine the session seed, a sequential
/// counter and a short random tail, so two sessions that happen to share a
/// seed still do not collide in practice.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_seed(session_seed())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate the next id
    pub fn new_id(&mut self) -> String {
        self.count += 1;

        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();

        format!("{}-{:x}{}", self.seed, self.count, suffix)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.count
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
