pub mod search;

pub use search::SearchArgs;
