//! In-memory test audio

use std::io::Cursor;

/// A short mono 16 kHz tone as WAV bytes
///
/// The decoder probes by content, so the same bytes also stand in for
/// uploads named `.mp3` or `.mp4`.
pub fn tone_wav() -> Vec<u8> {
    tone_wav_of(1_600)
}

/// A mono 16 kHz tone of `samples` samples as WAV bytes
pub fn tone_wav_of(samples: i16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for i in 0..samples {
            writer.write_sample((i % 40) * 300).expect("sample written");
        }
        writer.finalize().expect("wav finalized");
    }

    cursor.into_inner()
}

/// A real MPEG-2 layer III clip shared with the speech crate's tests
pub fn sample_mp3() -> Vec<u8> {
    include_bytes!("../../../stt/tests/fixtures/sample.mp3").to_vec()
}

/// Matroska with a video track ahead of its MP3 audio track
pub fn video_first_mkv() -> Vec<u8> {
    include_bytes!("../../../stt/tests/fixtures/video_first.mkv").to_vec()
}
