use url::Url;

use crate::JobKey;

/// Source tag appended to native ids so keys stay unique across job sites.
pub const SOURCE_TAG: &str = "linkedin";

const SITE_DOMAIN: &str = "linkedin.com";
const JOB_ID_PARAM: &str = "currentJobId";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRoute {
    Search,
    View,
}

/// Classifies a tab URL as one of the two job page shapes we know how to read.
pub fn classify_job_url(raw: &str) -> Option<JobRoute> {
    let url = Url::parse(raw.trim()).ok()?;
    route_of(&url)
}

pub fn is_job_page(raw: &str) -> bool {
    classify_job_url(raw).is_some()
}

/// Native id from the `currentJobId` query parameter, or the trailing numeric
/// part of a `/jobs/view/<slug-or-id>/` path.
pub fn native_job_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let route = route_of(&url)?;

    let from_query = url
        .query_pairs()
        .find(|(name, _)| name == JOB_ID_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| is_numeric(value));
    if from_query.is_some() {
        return from_query;
    }

    match route {
        JobRoute::View => {
            let segment = url
                .path_segments()?
                .skip_while(|segment| *segment != "view")
                .nth(1)?;
            let tail = segment.rsplit('-').next()?;
            is_numeric(tail).then(|| tail.to_string())
        }
        JobRoute::Search => None,
    }
}

pub fn job_key(native_id: &str) -> JobKey {
    format!("{native_id}-{SOURCE_TAG}")
}

/// Key for the job shown at `raw`, if the page is a job page with an id.
pub fn job_key_for_url(raw: &str) -> Option<JobKey> {
    native_job_id(raw).map(|id| job_key(&id))
}

fn route_of(url: &Url) -> Option<JobRoute> {
    let host = url.host_str()?.to_ascii_lowercase();
    let on_site = host == SITE_DOMAIN || host.ends_with(&format!(".{SITE_DOMAIN}"));
    if !on_site {
        return None;
    }
    let path = url.path();
    if path == "/jobs/search" || path.starts_with("/jobs/search/") {
        Some(JobRoute::Search)
    } else if path.starts_with("/jobs/view/") {
        Some(JobRoute::View)
    } else {
        None
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
