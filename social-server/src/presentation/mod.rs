pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod resources;
pub mod utils;

#[cfg(test)]
pub mod test_support;
