use crate::url::domain::same_host;
use crate::url::normalize::normalize_link;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Link-following policy for one crawl job
///
/// Built once per job, before the crawl starts, so regexes are compiled a
/// single time and every page task shares the same policy.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    /// The job's seed; the reference host for the same-domain rule
    seed: Url,

    /// Restrict links to the seed's host
    same_domain: bool,

    /// Links must match this to be followed
    include: Option<Regex>,

    /// Links matching this are never followed
    exclude: Option<Regex>,
}

impl LinkFilter {
    /// Creates a new link filter, compiling the optional regexes
    ///
    /// # Returns
    ///
    /// * `Ok(LinkFilter)` - The compiled policy
    /// * `Err(ConfigError::InvalidPattern)` - One of the regexes does not compile
    pub fn new(
        seed: Url,
        same_domain: bool,
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            seed,
            same_domain,
            include: include.map(compile).transpose()?,
            exclude: exclude.map(compile).transpose()?,
        })
    }

    /// Returns the seed URL this filter compares hosts against
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Decides whether a normalized candidate URL should be followed
    ///
    /// Rules are applied in order and the first failing rule rejects:
    /// 1. Same-domain: the candidate host must equal the seed host exactly
    /// 2. Include regex: the candidate must match somewhere
    /// 3. Exclude regex: the candidate must not match anywhere
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_sweep::url::LinkFilter;
    /// use url::Url;
    ///
    /// let seed = Url::parse("https://example.com/").unwrap();
    /// let filter = LinkFilter::new(seed, true, None, Some(r"\.pdf$")).unwrap();
    ///
    /// assert!(filter.accepts(&Url::parse("https://example.com/about").unwrap()));
    /// assert!(!filter.accepts(&Url::parse("https://example.com/paper.pdf").unwrap()));
    /// assert!(!filter.accepts(&Url::parse("https://other.com/about").unwrap()));
    /// ```
    pub fn accepts(&self, candidate: &Url) -> bool {
        if self.same_domain && !same_host(&self.seed, candidate) {
            tracing::trace!("Rejected {} (different host)", candidate);
            return false;
        }

        if let Some(include) = &self.include {
            if !include.is_match(candidate.as_str()) {
                tracing::trace!("Rejected {} (does not match url_regex)", candidate);
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if exclude.is_match(candidate.as_str()) {
                tracing::trace!("Rejected {} (matches exclude_regex)", candidate);
                return false;
            }
        }

        true
    }

    /// Normalizes an href found on `page_url` and applies the policy
    ///
    /// Returns the normalized URL when the link should be followed.
    pub fn filter_link(&self, href: &str, page_url: &Url) -> Option<Url> {
        normalize_link(href, page_url).filter(|candidate| self.accepts(candidate))
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
