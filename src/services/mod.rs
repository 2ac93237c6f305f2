pub mod download;
pub mod encoding;
pub mod markup;
pub mod merge;
pub mod qa;
pub mod rebuild;
