pub mod ffmpeg_cli_renderer;
pub mod http_clip_fetcher;
