pub mod collector;
pub mod extractor;
pub mod identity;
pub mod predicate;
