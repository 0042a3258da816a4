use serde::Serialize;

use crate::domain::Verdict;

use super::ClassifierError;

/// Body of the check call: the classifier receives exactly the candidate URL.
#[derive(Debug, Serialize)]
pub struct CheckUrlRequest<'a> {
    pub url: &'a str,
}

/// Parses a 200 body into a verdict. Unknown extra fields are tolerated;
/// a payload missing the required shape is a `MalformedVerdict`.
pub fn parse_verdict(body: &str) -> Result<Verdict, ClassifierError> {
    let verdict: Verdict = serde_json::from_str(body)?;
    Ok(verdict)
}
