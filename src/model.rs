pub mod mapping;
pub mod sort;

pub use mapping::{Candidate, CandidateSet, MappingEntry};
pub use sort::{SortOption, sort_candidates};
