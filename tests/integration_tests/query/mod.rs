mod parse_tests;
mod registry_tests;
