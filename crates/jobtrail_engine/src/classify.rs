use std::sync::OnceLock;

use regex::Regex;

const EMPLOYMENT_TYPES: [&str; 3] = ["Full-time", "Part-time", "Internship"];
const WORK_TYPES: [&str; 3] = ["On-site", "Remote", "Hybrid"];

// Two amounts separated by a dash; each may carry a currency sign, a K/M
// multiplier and a per-period suffix.
const SALARY_PATTERN: &str = r"(?ix)^\s*
    (?:[a-z]{1,3}\s?)?[$€£¥₹]?\s*\d[\d,]*(?:\.\d+)?\s*[km]?(?:\s*/\s*[a-z]{2,5})?
    \s*[-–—]\s*
    (?:[a-z]{1,3}\s?)?[$€£¥₹]?\s*\d[\d,]*(?:\.\d+)?\s*[km]?
    (?:\s*/\s*(?:yr|year|hr|hour|mo|month|wk|week|day))?
    \s*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    EmploymentType,
    WorkType,
    SalaryRange,
}

/// Employment details read from the short label fragments of a job page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmploymentDetails {
    pub employment_type: Option<String>,
    pub work_type: Option<String>,
    pub salary_range: Option<String>,
}

pub fn classify_detail(fragment: &str) -> Option<DetailKind> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return None;
    }
    if matches_vocabulary(&EMPLOYMENT_TYPES, fragment) {
        Some(DetailKind::EmploymentType)
    } else if matches_vocabulary(&WORK_TYPES, fragment) {
        Some(DetailKind::WorkType)
    } else if salary_regex().is_match(fragment) {
        Some(DetailKind::SalaryRange)
    } else {
        None
    }
}

/// Sorts fragments into the three detail slots. The first fragment of each
/// kind wins; unmatched fragments are ignored.
pub fn classify_details<I, S>(fragments: I) -> EmploymentDetails
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut details = EmploymentDetails::default();
    for fragment in fragments {
        let fragment = fragment.as_ref().trim();
        let slot = match classify_detail(fragment) {
            Some(DetailKind::EmploymentType) => &mut details.employment_type,
            Some(DetailKind::WorkType) => &mut details.work_type,
            Some(DetailKind::SalaryRange) => &mut details.salary_range,
            None => continue,
        };
        if slot.is_none() {
            *slot = Some(fragment.to_string());
        }
    }
    details
}

fn matches_vocabulary(vocabulary: &[&str], fragment: &str) -> bool {
    vocabulary
        .iter()
        .any(|term| term.eq_ignore_ascii_case(fragment))
}

fn salary_regex() -> &'static Regex {
    static SALARY: OnceLock<Regex> = OnceLock::new();
    SALARY.get_or_init(|| Regex::new(SALARY_PATTERN).expect("salary pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::{classify_detail, classify_details, DetailKind, EmploymentDetails};

    #[test]
    fn labels_are_classified() {
        assert_eq!(
            classify_detail("$90,000 - $120,000/yr"),
            Some(DetailKind::SalaryRange)
        );
        assert_eq!(classify_detail("Remote"), Some(DetailKind::WorkType));
        assert_eq!(classify_detail("Full-time"), Some(DetailKind::EmploymentType));
        assert_eq!(classify_detail("Senior Engineer"), None);
    }

    #[test]
    fn vocabulary_is_case_insensitive() {
        assert_eq!(classify_detail(" on-site "), Some(DetailKind::WorkType));
        assert_eq!(classify_detail("INTERNSHIP"), Some(DetailKind::EmploymentType));
        assert_eq!(classify_detail("Contract"), None);
    }

    #[test]
    fn salary_variants_are_recognised() {
        for salary in [
            "$90K/yr - $120K/yr",
            "€45 - €60/hr",
            "£50,000-£65,000",
            "120000 - 150000",
            "US$ 90.5K - 110K / year",
        ] {
            assert_eq!(
                classify_detail(salary),
                Some(DetailKind::SalaryRange),
                "{salary}"
            );
        }
    }

    #[test]
    fn non_ranges_are_not_salaries() {
        for text in ["$90,000/yr", "10+ applicants", "Posted 2 - 3 days ago", "-", ""] {
            assert_eq!(classify_detail(text), None, "{text}");
        }
    }

    #[test]
    fn first_fragment_of_each_kind_wins() {
        let details = classify_details([
            "Hybrid",
            "Matches your job preferences",
            "$100K/yr - $130K/yr",
            "Full-time",
            "Remote",
        ]);
        assert_eq!(
            details,
            EmploymentDetails {
                employment_type: Some("Full-time".to_string()),
                work_type: Some("Hybrid".to_string()),
                salary_range: Some("$100K/yr - $130K/yr".to_string()),
            }
        );
    }
}
