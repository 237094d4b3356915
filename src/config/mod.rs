pub mod constants;
pub mod stopwords;
