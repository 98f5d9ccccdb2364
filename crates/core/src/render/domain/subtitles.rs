use std::fmt::Write;

use crate::shared::timeline::TimedInterval;

/// SRT timestamp `HH:MM:SS,mmm`, rounded to the millisecond.
pub fn seconds_to_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let s = (total_ms / 1000) % 60;
    let m = (total_ms / 60_000) % 60;
    let h = total_ms / 3_600_000;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Renders caption intervals as an SRT document, numbered from 1.
pub fn format_srt(captions: &[TimedInterval<String>]) -> String {
    let mut out = String::new();
    for (i, caption) in captions.iter().enumerate() {
        if i != 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n",
            i + 1,
            seconds_to_timestamp(caption.start()),
            seconds_to_timestamp(caption.end()),
            caption.payload().trim(),
        );
    }
    out
}
