use std::time::Duration;

use jobtrail_core::{job_key_for_url, ExtractionResult};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use trail_logging::{trail_debug, trail_info, trail_warn};
use url::Url;

use crate::classify::{classify_details, EmploymentDetails};
use crate::layout::CompiledLayout;
use crate::poll::poll_until;
use crate::sanitize::{collapse_text, DescriptionSanitizer};
use crate::{Document, ExtractError, Field, LayoutError, PageLayout};

/// What a field timeout does to the rest of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Only the timed-out field is left empty.
    #[default]
    FieldOnly,
    /// A description timeout empties the whole record.
    WholeRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSettings {
    pub poll_interval: Duration,
    /// Applied to every field routine alike.
    pub field_timeout: Duration,
    pub timeout_policy: TimeoutPolicy,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            field_timeout: Duration::from_millis(5000),
            timeout_policy: TimeoutPolicy::FieldOnly,
        }
    }
}

/// Reads one job record out of a page that may still be rendering.
///
/// Each field is polled by its own routine; the routines run concurrently and
/// the record is assembled once all of them have settled.
#[derive(Debug, Clone)]
pub struct JobExtractor {
    settings: ExtractionSettings,
    layout: CompiledLayout,
    sanitizer: DescriptionSanitizer,
}

type Company = (Option<String>, Option<String>);

impl JobExtractor {
    pub fn new(settings: ExtractionSettings, layout: &PageLayout) -> Result<Self, LayoutError> {
        let layout = CompiledLayout::compile(layout)?;
        Ok(Self {
            settings,
            sanitizer: DescriptionSanitizer::from_compiled(layout.clone()),
            layout,
        })
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    pub async fn extract(&self, document: &dyn Document) -> ExtractionResult {
        self.extract_with_cancel(document, &CancellationToken::new())
            .await
    }

    /// Like [`JobExtractor::extract`]; cancelling `cancel` settles every
    /// pending routine, leaving its field empty.
    pub async fn extract_with_cancel(
        &self,
        document: &dyn Document,
        cancel: &CancellationToken,
    ) -> ExtractionResult {
        let layout = &self.layout;
        let (id, title, location, company, details, description) = tokio::join!(
            self.poll(Field::JobId, cancel, || Some(job_key_for_url(&document.url()))),
            self.poll(Field::Title, cancel, || {
                probe_title(layout, &snapshot(document))
            }),
            self.poll(Field::Location, cancel, || {
                probe_location(layout, &snapshot(document))
            }),
            self.poll(Field::Company, cancel, || {
                probe_company(layout, &snapshot(document), &document.url())
            }),
            self.poll(Field::EmploymentDetails, cancel, || {
                probe_details(layout, &snapshot(document))
            }),
            self.poll(Field::Description, cancel, || {
                probe_description(layout, &self.sanitizer, &snapshot(document))
            }),
        );

        let description_timed_out = matches!(&description, Err(err) if err.is_timeout());
        if description_timed_out && self.settings.timeout_policy == TimeoutPolicy::WholeRecord {
            trail_warn!("Description timed out; discarding the whole record");
            return ExtractionResult::default();
        }

        let (company_name, logo_src) = settled(company).unwrap_or_default();
        let details: EmploymentDetails = settled(details).unwrap_or_default();
        let result = ExtractionResult {
            id: settled(id).flatten(),
            job_title: settled(title).flatten(),
            location: settled(location).flatten(),
            company_name,
            logo_src,
            job_description: settled(description).filter(|html| !html.is_empty()),
            employment_type: details.employment_type,
            work_type: details.work_type,
            salary_range: details.salary_range,
            url: Some(document.url()),
        };
        trail_info!(
            "Extracted job id={:?} title={:?}",
            result.id,
            result.job_title
        );
        result
    }

    async fn poll<T, F>(
        &self,
        field: Field,
        cancel: &CancellationToken,
        probe: F,
    ) -> Result<T, ExtractError>
    where
        F: FnMut() -> Option<T>,
    {
        let outcome = poll_until(
            field,
            self.settings.poll_interval,
            self.settings.field_timeout,
            cancel,
            probe,
        )
        .await;
        match &outcome {
            Ok(_) => trail_debug!("Field {} resolved", field),
            Err(err) => trail_warn!("Field {} failed: {}", field, err),
        }
        outcome
    }
}

fn settled<T>(outcome: Result<T, ExtractError>) -> Option<T> {
    outcome.ok()
}

fn snapshot(document: &dyn Document) -> Html {
    Html::parse_document(&document.html())
}

// Each probe returns `None` while its fragment has not rendered yet, and
// `Some(value)` once it has, even if the value itself is missing.

fn probe_title(layout: &CompiledLayout, doc: &Html) -> Option<Option<String>> {
    let container = doc.select(&layout.title_container).next()?;
    Some(
        container
            .select(&layout.title)
            .next()
            .map(collapse_text)
            .filter(|text| !text.is_empty()),
    )
}

fn probe_location(layout: &CompiledLayout, doc: &Html) -> Option<Option<String>> {
    let element = doc.select(&layout.location).next()?;
    let text = collapse_text(element);
    Some((!text.is_empty()).then_some(text))
}

fn probe_company(layout: &CompiledLayout, doc: &Html, page_url: &str) -> Option<Company> {
    let container = doc.select(&layout.company_container).next()?;
    let name = container
        .select(&layout.company_name)
        .next()
        .map(collapse_text)
        .filter(|text| !text.is_empty());
    let logo = container
        .select(&layout.company_logo)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| resolve_url(src, page_url));
    Some((name, logo))
}

fn probe_details(layout: &CompiledLayout, doc: &Html) -> Option<EmploymentDetails> {
    let container = doc.select(&layout.details_container).next()?;
    let fragments = container
        .select(&layout.detail_fragment)
        .map(collapse_text)
        .collect::<Vec<_>>();
    Some(classify_details(fragments))
}

fn probe_description(
    layout: &CompiledLayout,
    sanitizer: &DescriptionSanitizer,
    doc: &Html,
) -> Option<String> {
    let element = doc.select(&layout.description).next()?;
    Some(sanitizer.sanitize(&element.inner_html()))
}

fn resolve_url(reference: &str, page_url: &str) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    Url::parse(page_url)
        .ok()
        .and_then(|base| base.join(trimmed).ok())
        .map(Into::into)
}
