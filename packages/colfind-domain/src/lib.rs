//! Pure ranking core: keyword normalization, lexical expansion, round-robin merging and
//! keyword-match evidence.

pub mod evidence;
pub mod inflect;
pub mod keywords;
pub mod lexicon;
pub mod merge;
