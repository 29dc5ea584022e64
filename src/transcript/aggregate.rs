use crate::transcribe::{Segment, TranscriptionRun};

/// Positional speaker label for a run: the i-th input track (0-indexed) is
/// `speaker_{i+1}`. There is no cross-track identity resolution; one audio
/// track is one speaker slot.
pub fn speaker_label(index: usize) -> String {
    format!("speaker_{}", index + 1)
}

/// Render one segment as a transcript line: `[start - end] speaker: text`.
///
/// Timestamps always carry two fractional digits. Only leading and trailing
/// whitespace is trimmed from the text; internal whitespace and punctuation
/// pass through verbatim. The segment itself is left untouched.
pub fn format_segment(segment: &Segment, speaker: &str) -> String {
    format!(
        "[{:.2} - {:.2}] {}: {}",
        segment.start,
        segment.end,
        speaker,
        segment.text.trim()
    )
}

/// Merge per-track runs into a single time-ordered transcript.
///
/// Lines are collected run by run in input order (which fixes the speaker
/// labeling), then stable-sorted by each segment's original start time:
/// segments with exactly equal starts keep run order first, emission order
/// second. The result joins lines with `\n` and has no trailing newline.
/// Runs without segments contribute nothing; all-empty input yields an
/// empty string, which is for the caller to judge.
pub fn aggregate(runs: &[TranscriptionRun]) -> String {
    let mut lines: Vec<(f64, String)> = Vec::new();
    for (index, run) in runs.iter().enumerate() {
        let speaker = speaker_label(index);
        for segment in &run.segments {
            lines.push((segment.start, format_segment(segment, &speaker)));
        }
    }

    // sort_by is stable: equal starts keep the flattening order
    lines.sort_by(|a, b| a.0.total_cmp(&b.0));

    let lines: Vec<String> = lines.into_iter().map(|(_, line)| line).collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::TranscriptionInfo;

    fn run_with(segments: Vec<(f64, f64, &str)>) -> TranscriptionRun {
        TranscriptionRun {
            segments: segments
                .into_iter()
                .map(|(start, end, text)| Segment {
                    start,
                    end,
                    text: text.to_string(),
                })
                .collect(),
            info: TranscriptionInfo {
                language: None,
                duration_seconds: 0.0,
            },
        }
    }

    #[test]
    fn labels_are_one_indexed() {
        assert_eq!(speaker_label(0), "speaker_1");
        assert_eq!(speaker_label(4), "speaker_5");
    }

    #[test]
    fn format_trims_outer_whitespace_only() {
        let segment = Segment {
            start: 1.5,
            end: 3.0,
            text: "  hello world  ".to_string(),
        };
        assert_eq!(
            format_segment(&segment, "speaker_1"),
            "[1.50 - 3.00] speaker_1: hello world"
        );
    }

    #[test]
    fn format_pads_whole_seconds() {
        let segment = Segment {
            start: 12.0,
            end: 15.0,
            text: "twelve".to_string(),
        };
        assert_eq!(
            format_segment(&segment, "speaker_2"),
            "[12.00 - 15.00] speaker_2: twelve"
        );
    }

    #[test]
    fn equal_starts_keep_run_order() {
        let runs = vec![
            run_with(vec![(5.0, 6.0, "first track")]),
            run_with(vec![(5.0, 6.5, "second track")]),
        ];
        assert_eq!(
            aggregate(&runs),
            "[5.00 - 6.00] speaker_1: first track\n[5.00 - 6.50] speaker_2: second track"
        );
    }

    #[test]
    fn empty_runs_aggregate_to_empty_string() {
        let runs = vec![run_with(vec![]), run_with(vec![])];
        assert_eq!(aggregate(&runs), "");
    }
}
