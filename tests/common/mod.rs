#![allow(dead_code)]

pub mod builders;
pub mod headers;
pub mod http;
