//! Precomputed, immutable, process-wide lookup tables: leaper attacks,
//! magic-hashed sliding attacks, and Zobrist keys. Every table here is
//! published once via `lazy_static` and never mutated after first access —
//! matching the teacher's `core::magic_helper::MagicHelper` pattern, rather
//! than the older `helper::boards` `static mut` globals.

pub mod leapers;
pub mod magic;
pub mod prng;
pub mod zobrist;
