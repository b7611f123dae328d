use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// CSS selectors describing where each field lives on a job page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub title_container: String,
    pub title: String,
    pub location: String,
    pub company_container: String,
    pub company_name: String,
    pub company_logo: String,
    pub details_container: String,
    pub detail_fragment: String,
    pub description: String,
    /// Sub-elements stripped from the description.
    pub description_strip: String,
    /// The "sourced from a job board" feedback banner.
    pub sourced_banner: String,
    pub description_heading: String,
    /// Heading text that only repeats the panel's own section title.
    pub redundant_heading_text: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            title_container: ".job-details-jobs-unified-top-card__job-title".to_string(),
            title: "h1".to_string(),
            location: ".job-details-jobs-unified-top-card__primary-description-container .tvm__text--low-emphasis".to_string(),
            company_container: ".job-details-jobs-unified-top-card__container--two-pane".to_string(),
            company_name: ".job-details-jobs-unified-top-card__company-name a".to_string(),
            company_logo: ".ivm-image-view-model img".to_string(),
            details_container: ".job-details-fit-level-preferences".to_string(),
            detail_fragment: "button".to_string(),
            description: ".jobs-description-content__text--stretch".to_string(),
            description_strip: "script, style, iframe, noscript".to_string(),
            sourced_banner: ".jobs-description__sourced-from-banner".to_string(),
            description_heading: "h1, h2, h3".to_string(),
            redundant_heading_text: "About the job".to_string(),
        }
    }
}

/// Parsed form of a [`PageLayout`].
#[derive(Debug, Clone)]
pub(crate) struct CompiledLayout {
    pub title_container: Selector,
    pub title: Selector,
    pub location: Selector,
    pub company_container: Selector,
    pub company_name: Selector,
    pub company_logo: Selector,
    pub details_container: Selector,
    pub detail_fragment: Selector,
    pub description: Selector,
    pub description_strip: Selector,
    pub sourced_banner: Selector,
    pub description_heading: Selector,
    pub redundant_heading_text: String,
}

impl CompiledLayout {
    pub fn compile(layout: &PageLayout) -> Result<Self, LayoutError> {
        Ok(Self {
            title_container: parse("title container", &layout.title_container)?,
            title: parse("title", &layout.title)?,
            location: parse("location", &layout.location)?,
            company_container: parse("company container", &layout.company_container)?,
            company_name: parse("company name", &layout.company_name)?,
            company_logo: parse("company logo", &layout.company_logo)?,
            details_container: parse("details container", &layout.details_container)?,
            detail_fragment: parse("detail fragment", &layout.detail_fragment)?,
            description: parse("description", &layout.description)?,
            description_strip: parse("description strip", &layout.description_strip)?,
            sourced_banner: parse("sourced banner", &layout.sourced_banner)?,
            description_heading: parse("description heading", &layout.description_heading)?,
            redundant_heading_text: layout.redundant_heading_text.trim().to_string(),
        })
    }
}

fn parse(name: &'static str, selector: &str) -> Result<Selector, LayoutError> {
    Selector::parse(selector).map_err(|_| LayoutError::InvalidSelector {
        name,
        selector: selector.to_string(),
    })
}
