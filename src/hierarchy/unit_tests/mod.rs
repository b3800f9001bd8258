#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod config_tests;
