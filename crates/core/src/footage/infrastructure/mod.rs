pub mod pexels_provider;
