mod user_store_impl;

pub use user_store_impl::*;
