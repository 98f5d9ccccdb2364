pub mod keyword_term_extractor;
