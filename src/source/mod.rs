pub mod fixture;

pub use fixture::{FixtureDocument, FixtureSource, RecordedFilter};
