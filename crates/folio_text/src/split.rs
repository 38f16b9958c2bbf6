//! Splitting a container's text into animatable spans

use crate::segment::{segment, Segment, SplitMode};
use folio_core::{Host, NodeId, NodeRef};
use smallvec::SmallVec;

/// Attribute marking whitespace spans
pub const SPACER_ATTR: &str = "data-spacer";
/// Attribute holding a span's segment index
pub const SEGMENT_ATTR: &str = "data-segment";

/// Options for [`SplitText`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitOptions {
    pub mode: SplitMode,
    /// In word mode, also wrap each character of a word in its own span.
    /// The character spans become the animated targets.
    pub chars_in_words: bool,
}

impl SplitOptions {
    pub fn chars() -> Self {
        Self {
            mode: SplitMode::Chars,
            chars_in_words: false,
        }
    }

    pub fn words() -> Self {
        Self {
            mode: SplitMode::Words,
            chars_in_words: false,
        }
    }

    pub fn words_then_chars() -> Self {
        Self {
            mode: SplitMode::Words,
            chars_in_words: true,
        }
    }
}

/// A span created for one segment
#[derive(Clone, Debug)]
pub struct SplitSpan {
    pub node: NodeId,
    pub segment: Segment,
    /// Character spans when split with `chars_in_words`
    pub chars: SmallVec<[NodeId; 8]>,
}

/// The spans created inside a container
pub struct SplitText {
    container: NodeId,
    text: String,
    options: SplitOptions,
    spans: Vec<SplitSpan>,
    animated: Vec<NodeRef>,
}

impl SplitText {
    /// Clear `container` and fill it with one span per segment of `text`
    pub fn split(host: &Host, container: NodeId, text: &str, mode: SplitMode) -> Self {
        Self::split_with(
            host,
            container,
            text,
            SplitOptions {
                mode,
                chars_in_words: false,
            },
        )
    }

    pub fn split_with(host: &Host, container: NodeId, text: &str, options: SplitOptions) -> Self {
        let mut split = Self {
            container,
            text: String::new(),
            options,
            spans: Vec::new(),
            animated: Vec::new(),
        };
        split.rebuild(host, text);
        split
    }

    /// Replace the text, clearing and rebuilding every span
    pub fn set_text(&mut self, host: &Host, text: &str) {
        self.rebuild(host, text);
    }

    fn rebuild(&mut self, host: &Host, text: &str) {
        self.spans.clear();
        self.animated.clear();
        self.text = text.to_string();

        let segments = segment(text, self.options.mode);
        let mut doc = host.document_mut();
        if !doc.exists(self.container) {
            tracing::debug!("split target {:?} no longer exists", self.container);
            return;
        }
        doc.clear_children(self.container);
        doc.set_attribute(self.container, "aria-label", text);

        let mut animated = Vec::new();
        for seg in segments {
            let span = doc.create_element("span");
            doc.set_attribute(span, SEGMENT_ATTR, &seg.index.to_string());
            doc.set_attribute(span, "aria-hidden", "true");
            doc.append_child(self.container, span);

            let mut chars = SmallVec::new();
            if seg.is_space {
                doc.set_attribute(span, SPACER_ATTR, "");
                let text_node = doc.create_text(&seg.text);
                doc.append_child(span, text_node);
            } else if self.options.mode == SplitMode::Words && self.options.chars_in_words {
                for ch in seg.text.chars() {
                    let char_span = doc.create_element("span");
                    let text_node = doc.create_text(ch.encode_utf8(&mut [0; 4]));
                    doc.append_child(char_span, text_node);
                    doc.append_child(span, char_span);
                    chars.push(char_span);
                    animated.push(char_span);
                }
            } else {
                let text_node = doc.create_text(&seg.text);
                doc.append_child(span, text_node);
                animated.push(span);
            }

            self.spans.push(SplitSpan {
                node: span,
                segment: seg,
                chars,
            });
        }
        drop(doc);

        self.animated = animated.into_iter().map(|id| host.node(id)).collect();
        tracing::trace!(
            spans = self.spans.len(),
            animated = self.animated.len(),
            "split text rebuilt"
        );
    }

    /// Put the plain text back, dropping all spans
    pub fn revert(&mut self, host: &Host) {
        let mut doc = host.document_mut();
        if doc.exists(self.container) {
            doc.clear_children(self.container);
            doc.remove_attribute(self.container, "aria-label");
            let text_node = doc.create_text(&self.text);
            doc.append_child(self.container, text_node);
        }
        drop(doc);
        self.spans.clear();
        self.animated.clear();
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> SplitOptions {
        self.options
    }

    /// Every span, spacers included, in document order
    pub fn spans(&self) -> &[SplitSpan] {
        &self.spans
    }

    /// Handles to the spans that should be animated (spacers excluded)
    pub fn animated(&self) -> &[NodeRef] {
        &self.animated
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Host, NodeId) {
        let host = Host::default();
        let heading = host.append_element(host.root(), "h1");
        (host, heading)
    }

    #[test]
    fn test_split_chars_creates_spans() {
        let (host, heading) = setup();
        let split = SplitText::split(&host, heading, "ab c", SplitMode::Chars);

        assert_eq!(split.len(), 4);
        assert_eq!(split.animated().len(), 3);
        let doc = host.document();
        assert_eq!(doc.children(heading).len(), 4);
        assert_eq!(doc.attribute(split.spans()[2].node, SPACER_ATTR), Some(""));
        assert_eq!(doc.text_content(heading), "ab c");
        assert_eq!(doc.attribute(heading, "aria-label"), Some("ab c"));
    }

    #[test]
    fn test_split_again_rebuilds_instead_of_appending() {
        let (host, heading) = setup();
        let first = SplitText::split(&host, heading, "hello world", SplitMode::Words);
        let _second = SplitText::split(&host, heading, "hello world", SplitMode::Words);

        let doc = host.document();
        assert_eq!(doc.children(heading).len(), 3);
        assert!(!doc.is_connected(first.spans()[0].node));
        assert_eq!(doc.text_content(heading), "hello world");
    }

    #[test]
    fn test_set_text_frees_old_spans() {
        let (host, heading) = setup();
        let mut split = SplitText::split(&host, heading, "one two three", SplitMode::Chars);
        let before = host.document().node_count();
        split.set_text(&host, "x");
        assert_eq!(split.animated().len(), 1);
        assert!(host.document().node_count() < before);
        assert_eq!(host.document().text_content(heading), "x");
    }

    #[test]
    fn test_chars_in_words() {
        let (host, heading) = setup();
        let split = SplitText::split_with(
            &host,
            heading,
            "hi you",
            SplitOptions::words_then_chars(),
        );

        assert_eq!(split.len(), 3);
        assert_eq!(split.spans()[0].chars.len(), 2);
        assert_eq!(split.spans()[2].chars.len(), 3);
        assert_eq!(split.animated().len(), 5);
        assert_eq!(host.document().text_content(heading), "hi you");
    }

    #[test]
    fn test_empty_text() {
        let (host, heading) = setup();
        let split = SplitText::split(&host, heading, "", SplitMode::Chars);
        assert!(split.is_empty());
        assert!(split.animated().is_empty());
        assert!(host.document().children(heading).is_empty());
    }

    #[test]
    fn test_revert_restores_plain_text() {
        let (host, heading) = setup();
        let mut split = SplitText::split(&host, heading, "a b", SplitMode::Chars);
        split.revert(&host);
        let doc = host.document();
        assert_eq!(doc.children(heading).len(), 1);
        assert_eq!(doc.text_content(heading), "a b");
        assert!(split.animated().is_empty());
    }
}
