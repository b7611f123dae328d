use ego_tree::NodeId;
use scraper::{ElementRef, Html};

use crate::layout::CompiledLayout;
use crate::{LayoutError, PageLayout};

/// Cleans the scraped description markup before it leaves the page context.
#[derive(Debug, Clone)]
pub struct DescriptionSanitizer {
    layout: CompiledLayout,
}

impl DescriptionSanitizer {
    pub fn new(layout: &PageLayout) -> Result<Self, LayoutError> {
        CompiledLayout::compile(layout).map(Self::from_compiled)
    }

    pub(crate) fn from_compiled(layout: CompiledLayout) -> Self {
        Self { layout }
    }

    /// Drops executable/style elements, the job-board banner and the redundant
    /// section heading, and returns the remaining markup trimmed.
    pub fn sanitize(&self, raw_html: &str) -> String {
        let mut fragment = Html::parse_fragment(raw_html);
        let layout = &self.layout;

        let mut doomed: Vec<NodeId> = fragment
            .select(&layout.description_strip)
            .chain(fragment.select(&layout.sourced_banner))
            .map(|element| element.id())
            .collect();
        if !layout.redundant_heading_text.is_empty() {
            doomed.extend(
                fragment
                    .select(&layout.description_heading)
                    .filter(|heading| {
                        collapse_text(*heading).eq_ignore_ascii_case(&layout.redundant_heading_text)
                    })
                    .map(|heading| heading.id()),
            );
        }

        for id in doomed {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
        }

        fragment.root_element().inner_html().trim().to_string()
    }
}

/// Element text with runs of whitespace collapsed to single spaces.
pub(crate) fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
