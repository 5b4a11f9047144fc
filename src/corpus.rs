//! Bulk corpus preparation: genre-labeled directories → training frames.

use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::acquire;
use crate::analysis::pipeline::FramePipeline;
use crate::config::PipelineSettings;

/// One audio file with the genre inherited from its parent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub path: PathBuf,
    pub genre: String,
}

/// Frames and their parallel label sequence, one label per frame.
#[derive(Debug, Clone)]
pub struct CorpusFrames {
    pub frames: Vec<Array2<f32>>,
    pub labels: Vec<String>,
}

/// Recursively collect supported audio files under `root`.
///
/// The genre of a file is the name of the directory that contains it, the
/// usual `root/<genre>/<clip>` corpus layout. Entries come back in sorted
/// path order so corpus preparation is reproducible across runs.
pub fn collect_audio_paths(root: &Path) -> Result<Vec<CorpusEntry>, String> {
    let mut entries = Vec::new();
    walk(root, &mut entries)?;
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn walk(dir: &Path, entries: &mut Vec<CorpusEntry>) -> Result<(), String> {
    let read = std::fs::read_dir(dir)
        .map_err(|err| format!("Failed to read corpus directory {}: {err}", dir.display()))?;
    for entry in read {
        let entry = entry
            .map_err(|err| format!("Failed to read corpus entry in {}: {err}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, entries)?;
        } else if acquire::is_supported(&path) {
            let genre = path
                .parent()
                .and_then(|parent| parent.file_name())
                .and_then(|name| name.to_str())
                .unwrap_or("unknown")
                .to_string();
            entries.push(CorpusEntry { path, genre });
        }
    }
    Ok(())
}

/// Decode every corpus file and run the labeled frame pipeline over it.
///
/// A file that fails to decode is logged and skipped; one broken download
/// must not abort hours of corpus preparation. Frames keep their clip order
/// and every frame carries its clip's genre.
pub fn prepare_corpus(
    root: &Path,
    settings: &PipelineSettings,
) -> Result<CorpusFrames, String> {
    let entries = collect_audio_paths(root)?;
    let pipeline = FramePipeline::new(settings);
    let mut frames = Vec::new();
    let mut labels = Vec::new();
    for entry in &entries {
        let mono = match acquire::load_mono(&entry.path, settings.analysis_sample_rate) {
            Ok(mono) => mono,
            Err(err) => {
                tracing::warn!(
                    path = %entry.path.display(),
                    "skipping corpus file: {err}"
                );
                continue;
            }
        };
        let (clip_frames, clip_labels) =
            pipeline.labeled_frames(&mono, settings.analysis_sample_rate, &entry.genre)?;
        frames.extend(clip_frames);
        labels.extend(clip_labels);
    }
    tracing::info!(
        clips = entries.len(),
        frames = frames.len(),
        "corpus preparation finished"
    );
    Ok(CorpusFrames { frames, labels })
}
