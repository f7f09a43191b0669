use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use hound::{SampleFormat, WavSpec, WavWriter};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::{FormatOptions, FormatReader},
    io::{MediaSourceStream, MediaSourceStreamOptions},
    meta::MetadataOptions,
    probe::Hint,
};

use crate::{
    error::{Result, SttError},
    types::{AudioKind, AudioSource, CANONICAL_EXTENSION, NormalizationOutcome},
};

type PcmWriter = WavWriter<BufWriter<File>>;

/// Converts inputs into 16-bit PCM WAV files under a working directory
///
/// Blocking; callers on the async runtime go through `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    work_dir: PathBuf,
}

impl Normalizer {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Bring `source` into canonical form as `<work_dir>/<session_name>.wav`
    ///
    /// WAV input is returned untouched. The source file is never removed.
    ///
    /// # Errors
    ///
    /// Returns [`SttError::Transcode`] if the input cannot be opened, holds no
    /// decodable audio, or the output cannot be written
    pub fn normalize(&self, source: &AudioSource, session_name: &str) -> Result<NormalizationOutcome> {
        let file = File::open(&source.path)
            .map_err(|e| SttError::Transcode(format!("cannot open {}: {e}", source.path.display())))?;

        if source.kind == AudioKind::Wav {
            tracing::debug!(path = %source.path.display(), "input already canonical, skipping transcode");
            return Ok(NormalizationOutcome {
                normalized_path: source.path.clone(),
                was_transcoded: false,
            });
        }

        let output = self.work_dir.join(format!("{session_name}.{CANONICAL_EXTENSION}"));

        if let Err(e) = transcode(file, source, &output) {
            // Leave no half-written artifact behind
            match std::fs::remove_file(&output) {
                Ok(()) => {}
                Err(cleanup) if cleanup.kind() == std::io::ErrorKind::NotFound => {}
                Err(cleanup) => {
                    tracing::warn!(path = %output.display(), error = %cleanup, "failed to remove partial output");
                }
            }
            tracing::error!(input = %source.path.display(), error = %e, "transcode failed");
            return Err(e);
        }

        tracing::info!(
            input = %source.path.display(),
            output = %output.display(),
            kind = ?source.kind,
            "converted input to WAV"
        );

        Ok(NormalizationOutcome {
            normalized_path: output,
            was_transcoded: true,
        })
    }
}

fn transcode(file: File, source: &AudioSource, output: &Path) -> Result<()> {
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(extension) = source.path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| SttError::Transcode(format!("probe: {e}")))?;

    let mut format = probed.format;

    let (track_id, decoder) = match source.kind {
        AudioKind::LossyAudio => default_stream(format.as_ref())?,
        AudioKind::MediaContainer | AudioKind::Wav => first_audio_track(format.as_ref())?,
    };

    decode_to_wav(format.as_mut(), track_id, decoder, output)
}

/// The container's default stream; lossy audio files carry exactly one
fn default_stream(format: &dyn FormatReader) -> Result<(u32, Box<dyn Decoder>)> {
    let track = format
        .default_track()
        .ok_or_else(|| SttError::Transcode("no audio stream found".to_string()))?;

    let decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| SttError::Transcode(format!("codec: {e}")))?;

    Ok((track.id, decoder))
}

/// First track that a registered audio codec can decode, skipping video and data tracks
fn first_audio_track(format: &dyn FormatReader) -> Result<(u32, Box<dyn Decoder>)> {
    format
        .tracks()
        .iter()
        .filter(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .find_map(|track| {
            symphonia::default::get_codecs()
                .make(&track.codec_params, &DecoderOptions::default())
                .ok()
                .map(|decoder| (track.id, decoder))
        })
        .ok_or_else(|| SttError::Transcode("container has no decodable audio track".to_string()))
}

fn decode_to_wav(
    format: &mut dyn FormatReader,
    track_id: u32,
    mut decoder: Box<dyn Decoder>,
    output: &Path,
) -> Result<()> {
    let mut writer: Option<PcmWriter> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(SttError::Transcode(format!("packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "skipping corrupt audio frame");
                continue;
            }
            Err(e) => return Err(SttError::Transcode(format!("decode: {e}"))),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let mut samples = SampleBuffer::<i16>::new(frames as u64, spec);
        samples.copy_interleaved_ref(decoded);

        if writer.is_none() {
            let channels = u16::try_from(spec.channels.count())
                .map_err(|_| SttError::Transcode("too many channels".to_string()))?;
            writer = Some(create_writer(output, channels, spec.rate)?);
        }

        let Some(pcm) = writer.as_mut() else {
            continue;
        };

        for &sample in samples.samples() {
            pcm.write_sample(sample)
                .map_err(|e| SttError::Transcode(format!("write: {e}")))?;
        }
    }

    writer
        .ok_or_else(|| SttError::Transcode("no audio samples decoded".to_string()))?
        .finalize()
        .map_err(|e| SttError::Transcode(format!("finalize: {e}")))
}

fn create_writer(output: &Path, channels: u16, sample_rate: u32) -> Result<PcmWriter> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    WavWriter::create(output, spec).map_err(|e| SttError::Transcode(format!("cannot create {}: {e}", output.display())))
}
