//! Container decoding into interleaved `f32` samples via symphonia.

use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error, formats::FormatOptions,
    io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

/// Raw decoded audio in interleaved `f32` samples.
pub(crate) struct DecodedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

/// Read the declared duration without decoding the stream.
///
/// Returns `None` when the container does not declare a frame count; callers
/// fall back to checking duration after decode.
pub(crate) fn probe_duration_seconds(path: &Path) -> Result<Option<f32>, String> {
    let file = File::open(path).map_err(|err| format!("Open {}: {err}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| format!("Probe failed for {}: {err}", path.display()))?;
    let format = probed.format;
    let Some(track) = format.default_track() else {
        return Ok(None);
    };
    let params = &track.codec_params;
    match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => {
            Ok(Some(frames as f32 / rate as f32))
        }
        _ => Ok(None),
    }
}

/// Decode audio into interleaved `f32` samples, stopping after `max_seconds`
/// of material when a cap is given.
pub(crate) fn decode_audio(path: &Path, max_seconds: Option<f32>) -> Result<DecodedAudio, String> {
    let file = File::open(path).map_err(|err| format!("Open {}: {err}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| format!("Probe failed for {}: {err}", path.display()))?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| format!("No default track in {}", path.display()))?;
    let codec_params = &track.codec_params;
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| format!("Missing sample rate in {}", path.display()))?;
    let channels = codec_params
        .channels
        .ok_or_else(|| format!("Missing channel count in {}", path.display()))?
        .count() as u16;
    let max_samples = max_seconds.filter(|limit| *limit > 0.0).map(|limit| {
        let frames = (limit * sample_rate as f32).ceil().max(1.0);
        (frames as usize).saturating_mul(channels as usize).max(1)
    });

    let mut decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|err| format!("No decoder for {}: {err}", path.display()))?;

    let mut samples = Vec::new();
    loop {
        if max_samples.is_some_and(|limit| samples.len() >= limit) {
            break;
        }
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(err) => {
                return Err(format!("Packet read failed for {}: {err}", path.display()));
            }
        };
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            // Recoverable corruption: skip the packet, keep what decodes.
            Err(Error::DecodeError(_)) => continue,
            Err(err) => {
                return Err(format!("Decode failed for {}: {err}", path.display()));
            }
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
        if let Some(limit) = max_samples {
            if samples.len() >= limit {
                samples.truncate(limit);
                break;
            }
        }
    }

    if samples.is_empty() {
        return Err(format!("Decoded 0 samples from {}", path.display()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: sample_rate.max(1),
        channels: channels.max(1),
    })
}
