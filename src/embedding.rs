//! Deterministic lexical embedding and the embedder seam.
//!
//! The engine only requires that embedding be deterministic for a fixed input:
//! the same query against a fixed index must return the same ordering and
//! scores. The default [`LexicalEmbedder`] satisfies this with feature hashing
//! over tokens — stable, offline, and dependency-free beyond `blake3`.
//!
//! It is *not* a neural embedding model. Callers with a real vector backend
//! implement [`Embedder`] themselves and hand it to
//! [`DirectoryIndex::build_with`](crate::DirectoryIndex::build_with).

use blake3::Hasher;

/// Default embedding dimensionality for lexical embeddings.
///
/// Keep this modest to control memory usage; variant sets are small.
pub const DEFAULT_EMBEDDING_DIM: usize = 64;

/// The replaceable embedding backend.
///
/// Implementations must be deterministic: `embed` called twice with the same
/// text must return the same vector, or resolution loses its reproducibility
/// guarantees.
pub trait Embedder: Send + Sync {
    /// Embeds a single piece of text.
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Embeds a batch of texts.
    ///
    /// The default implementation maps [`Embedder::embed`] over the batch;
    /// backends with a vectorized call should override it. This is a
    /// throughput optimization only — results must match element-wise.
    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Deterministic feature-hashing embedder over word tokens.
#[derive(Debug, Clone, Copy)]
pub struct LexicalEmbedder {
    dim: usize,
}

impl LexicalEmbedder {
    /// Creates an embedder with the default dimensionality.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dim: DEFAULT_EMBEDDING_DIM,
        }
    }

    /// Creates an embedder with a custom dimensionality.
    #[must_use]
    pub const fn with_dim(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for LexicalEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for LexicalEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        lexical_embedding_with_dim(text, self.dim)
    }
}

fn tokenize(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

/// Creates a deterministic lexical embedding with the default dimension.
#[must_use]
pub fn lexical_embedding(text: &str) -> Vec<f32> {
    lexical_embedding_with_dim(text, DEFAULT_EMBEDDING_DIM)
}

/// Creates a deterministic lexical embedding with a custom dimension.
#[must_use]
pub fn lexical_embedding_with_dim(text: &str, dim: usize) -> Vec<f32> {
    if dim == 0 {
        return Vec::new();
    }

    let mut vec = vec![0.0f32; dim];
    let mut count = 0u32;

    for token in tokenize(&text.to_lowercase()) {
        let mut h = Hasher::new();
        h.update(token.as_bytes());
        let hash = h.finalize();
        let bytes = hash.as_bytes();

        // Spread each token over four buckets, one per 8-byte chunk of the
        // hash. A single shared bucket between two unrelated tokens then
        // moves similarity far less than the decision threshold.
        for chunk in bytes.chunks_exact(8) {
            let mut bucket = 0u64;
            bucket |= u64::from(chunk[0]);
            bucket |= u64::from(chunk[1]) << 8;
            bucket |= u64::from(chunk[2]) << 16;
            bucket |= u64::from(chunk[3]) << 24;
            bucket |= u64::from(chunk[4]) << 32;
            bucket |= u64::from(chunk[5]) << 40;
            bucket |= u64::from(chunk[6]) << 48;

            #[allow(clippy::cast_possible_truncation)]
            let idx = (bucket as usize) % dim;
            let sign = if (chunk[7] & 1) == 0 { 1.0f32 } else { -1.0f32 };
            vec[idx] += sign;
        }
        count = count.saturating_add(1);
    }

    if count == 0 {
        return vec;
    }

    // L2-normalize.
    let mut norm2 = 0.0f64;
    for &x in &vec {
        norm2 += f64::from(x) * f64::from(x);
    }
    if norm2 > 0.0 {
        let inv = (norm2.sqrt()).recip();
        #[allow(clippy::cast_possible_truncation)]
        let invf = inv as f32;
        for x in &mut vec {
            *x *= invf;
        }
    }

    vec
}

/// Bounded, symmetric closeness score in [0, 1] between two vectors.
///
/// Cosine similarity with negative values clamped to zero, so that an exact
/// variant hit scores 1.0 and anti-correlated hash noise scores 0.0.
/// Mismatched or zero-length vectors score 0.0.
#[must_use]
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cos = dot / (norm_a.sqrt() * norm_b.sqrt());
    #[allow(clippy::cast_possible_truncation)]
    {
        cos.clamp(0.0, 1.0) as f32
    }
}
