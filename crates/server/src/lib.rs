pub mod config;
pub mod http;
pub mod pages;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
