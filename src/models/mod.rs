pub mod contract;
pub mod document;
pub mod enums;
pub mod news;
pub mod report;

pub use contract::{Contract, ContractReview};
pub use document::Document;
pub use news::{NewsArticle, NewsFilters, NewsResponse, NewsSource};
pub use report::CorruptionReport;
