pub mod conversion;
pub mod converter;
