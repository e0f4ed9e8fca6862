pub mod config;
pub mod error;
pub mod roster;
pub mod types;

pub use config::Config;
pub use error::YeouidoError;
pub use roster::{load_roster, roster_names, LegislatorRecord};
pub use types::{ArticleStub, Polarity, ProcessedArticle, BODY_TRUNCATE_CHARS};
