//! Pure text segmentation
//!
//! Splits a string into characters or words. Every run of whitespace becomes
//! exactly one spacer segment, so joining all segment texts reproduces the
//! input and joining only the non-spacers reproduces it without whitespace.

/// Granularity of a split
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitMode {
    #[default]
    Chars,
    Words,
}

/// One piece of split text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// Position in the segment list, spacers included
    pub index: usize,
    pub is_space: bool,
}

/// Split `text` according to `mode`
pub fn segment(text: &str, mode: SplitMode) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut push = |text: String, is_space: bool| {
        let index = segments.len();
        segments.push(Segment {
            text,
            index,
            is_space,
        });
    };

    let mut current = String::new();
    let mut in_space = false;

    for ch in text.chars() {
        let is_space = ch.is_whitespace();
        if !current.is_empty() && is_space != in_space {
            push(std::mem::take(&mut current), in_space);
        }
        in_space = is_space;

        if !is_space && mode == SplitMode::Chars {
            push(ch.to_string(), false);
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        push(current, in_space);
    }

    segments
}

/// Number of non-spacer segments
pub fn animated_count(segments: &[Segment]) -> usize {
    segments.iter().filter(|s| !s.is_space).count()
}
