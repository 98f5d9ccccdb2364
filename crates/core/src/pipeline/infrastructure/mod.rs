pub mod threaded_match_executor;
