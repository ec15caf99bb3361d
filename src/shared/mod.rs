pub mod config;
pub mod path;
pub mod response;

#[cfg(test)]
mod path_test;
