//! HTTP request handlers.

pub(crate) mod convert;
