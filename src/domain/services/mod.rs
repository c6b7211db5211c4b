mod normalizer;
mod similarity;

pub use normalizer::normalize_address;
pub use similarity::{BigramCosine, Profile, BIGRAM};
