//! Pipeline-wide properties: segment geometry, frame shapes, determinism.

mod support;

use genrescope::analysis::normalize::fit_time_axis;
use genrescope::analysis::pipeline::FramePipeline;
use genrescope::analysis::segment::Segmenter;
use genrescope::analysis::spectrogram::{MEL_BANDS, STFT_HOP, SpectrogramBuilder};
use genrescope::config::PipelineSettings;
use ndarray::Array2;

use support::tone;

const SAMPLE_RATE: u32 = 22_050;

fn pipeline() -> FramePipeline {
    FramePipeline::new(&PipelineSettings::default())
}

#[test]
fn hundred_thousand_sample_clip_splits_into_23_segments() {
    let plan = Segmenter::new(0.06, 0.3).plan(100_000);
    assert_eq!(plan.chunk, 6_000);
    assert_eq!(plan.stride, 4_200);
    assert_eq!(plan.ranges.len(), (100_000 - 6_000) / 4_200 + 1);
    assert_eq!(plan.ranges.len(), 23);
}

#[test]
fn segment_count_matches_offset_enumeration_across_lengths() {
    for total in [500usize, 1_024, 22_050, 44_100, 100_000, 321_123] {
        let plan = Segmenter::new(0.06, 0.3).plan(total);
        if plan.chunk == 0 || plan.stride == 0 {
            assert!(plan.ranges.is_empty());
            continue;
        }
        let expected = (0..total - plan.chunk + plan.stride)
            .step_by(plan.stride)
            .filter(|start| start + plan.chunk <= total)
            .count();
        assert_eq!(plan.ranges.len(), expected, "length {total}");
        for &(start, end) in &plan.ranges {
            assert_eq!(end - start, plan.chunk, "length {total}");
        }
    }
}

#[test]
fn every_emitted_frame_has_the_classifier_shape() {
    let frames = pipeline()
        .frames(&tone(90_000, SAMPLE_RATE), SAMPLE_RATE)
        .unwrap();
    assert!(!frames.is_empty());
    for frame in &frames {
        assert_eq!(frame.dim(), (MEL_BANDS, 78));
    }
}

#[test]
fn spectrogram_time_steps_follow_the_hop_convention() {
    let mut builder = SpectrogramBuilder::new(SAMPLE_RATE).unwrap();
    for len in [1_000usize, 6_000, 8_192, 20_000] {
        let frame = builder.build(&tone(len, SAMPLE_RATE)).unwrap();
        assert_eq!(frame.dim(), (MEL_BANDS, len / STFT_HOP + 1));
    }
}

#[test]
fn normalizer_boundaries_pad_and_truncate_by_one_column() {
    let exact = Array2::<f32>::ones((MEL_BANDS, 78));
    assert_eq!(fit_time_axis(exact.clone(), 78), exact);

    let short = Array2::<f32>::ones((MEL_BANDS, 77));
    let padded = fit_time_axis(short, 78);
    assert_eq!(padded.dim(), (MEL_BANDS, 78));
    assert!(padded.column(77).iter().all(|&v| v == 0.0));
    assert!(padded.column(76).iter().all(|&v| v == 1.0));

    let long = Array2::<f32>::ones((MEL_BANDS, 79));
    let truncated = fit_time_axis(long, 78);
    assert_eq!(truncated.dim(), (MEL_BANDS, 78));
    assert!(truncated.iter().all(|&v| v == 1.0));
}

#[test]
fn empty_waveform_produces_zero_frames() {
    assert!(pipeline().frames(&[], SAMPLE_RATE).unwrap().is_empty());
}

#[test]
fn sub_window_waveform_produces_zero_frames() {
    // 16 samples: the 6% window floors to a zero-length chunk.
    let frames = pipeline()
        .frames(&tone(16, SAMPLE_RATE), SAMPLE_RATE)
        .unwrap();
    assert!(frames.is_empty());
}

#[test]
fn two_runs_are_bit_identical() {
    let samples = tone(70_000, SAMPLE_RATE);
    let pipeline = pipeline();
    let first = pipeline.frames(&samples, SAMPLE_RATE).unwrap();
    let second = pipeline.frames(&samples, SAMPLE_RATE).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn frames_and_labels_stay_parallel() {
    let (frames, labels) = pipeline()
        .labeled_frames(&tone(80_000, SAMPLE_RATE), SAMPLE_RATE, "disco")
        .unwrap();
    assert_eq!(frames.len(), labels.len());
    assert!(!frames.is_empty());
    assert!(labels.iter().all(|label| label == "disco"));
}
