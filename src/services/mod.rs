//! Business rules, independent of HTTP. Every operation takes the injected data store as
//! `&dyn Repository` and ends in either a response value or an
//! [`ApiError`](crate::error::ApiError).

pub mod article;
pub mod comment;
pub mod user;
