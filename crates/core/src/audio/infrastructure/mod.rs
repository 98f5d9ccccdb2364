pub mod ffmpeg_audio_reader;
pub mod piper_synthesizer;
pub mod whisper_recognizer;
