pub mod commands;
pub mod domain;
pub mod services;

#[cfg(test)]
pub mod test_support;
