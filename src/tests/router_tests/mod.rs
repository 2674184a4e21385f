mod map_tests;
mod property_tests;
mod search_tests;
