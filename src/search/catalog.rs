//! Worker catalog
//!
//! The set of information sources a search fans out to is configuration, not
//! control flow. Each source is a [`WorkerTemplate`] whose task text and start
//! URL carry `{franchise}`, `{city}`, `{state}` and `{country}` placeholders;
//! rendering a template against a [`LocationQuery`] yields the immutable
//! [`WorkerSpec`] a runner executes.

use crate::types::{LocationQuery, SourceInfo};
use serde::{Deserialize, Serialize};

/// Immutable configuration for one worker runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSpec {
    /// Source name, used as the event `source` label
    pub name: String,
    /// Natural-language task handed to the worker capability
    pub task_description: String,
    /// Resource the capability starts from
    pub start_url: String,
    /// Upper bound on the work the capability may perform
    pub step_budget: u32,
    /// Named LLM provider override; `None` means the agent default
    pub provider: Option<String>,
}

impl WorkerSpec {
    pub fn new(
        name: impl Into<String>,
        task_description: impl Into<String>,
        start_url: impl Into<String>,
        step_budget: u32,
    ) -> Self {
        Self {
            name: name.into(),
            task_description: task_description.into(),
            start_url: start_url.into(),
            step_budget,
            provider: None,
        }
    }
}

/// Operator-configured source, as written in `[[workers]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerTemplate {
    pub name: String,

    /// Task text with query placeholders
    pub task: String,

    /// Start URL with query placeholders (values are form-urlencoded)
    pub start_url: String,

    #[serde(default = "default_step_budget")]
    pub step_budget: u32,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Provider name from `[providers]`; falls back to `[agent].provider`
    #[serde(default)]
    pub provider: Option<String>,
}

fn default_step_budget() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl WorkerTemplate {
    pub fn new(
        name: impl Into<String>,
        task: impl Into<String>,
        start_url: impl Into<String>,
        step_budget: u32,
    ) -> Self {
        Self {
            name: name.into(),
            task: task.into(),
            start_url: start_url.into(),
            step_budget,
            enabled: true,
            provider: None,
        }
    }

    /// Render this template for one query
    pub fn render(&self, query: &LocationQuery) -> WorkerSpec {
        WorkerSpec {
            name: self.name.clone(),
            task_description: substitute(&self.task, query, |v| v.to_string()),
            start_url: substitute(&self.start_url, query, url_value),
            step_budget: self.step_budget,
            provider: self.provider.clone(),
        }
    }
}

fn substitute(template: &str, query: &LocationQuery, encode: impl Fn(&str) -> String) -> String {
    template
        .replace("{franchise}", &encode(&query.franchise_name))
        .replace("{city}", &encode(&query.city))
        .replace("{state}", &encode(&query.state))
        .replace("{country}", &encode(&query.country))
}

fn url_value(value: &str) -> String {
    urlencoding::encode(value.trim()).replace("%20", "+")
}

/// Ordered set of worker templates
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<WorkerTemplate>,
}

impl Catalog {
    pub fn new(templates: Vec<WorkerTemplate>) -> Self {
        Self { templates }
    }

    /// The five sources the service ships with
    pub fn builtin() -> Self {
        Self::new(builtin_templates())
    }

    pub fn templates(&self) -> &[WorkerTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render every enabled template for `query`, in catalog order
    pub fn specs_for(&self, query: &LocationQuery) -> Vec<WorkerSpec> {
        self.templates
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.render(query))
            .collect()
    }

    pub fn sources(&self) -> Vec<SourceInfo> {
        self.templates
            .iter()
            .map(|t| SourceInfo {
                name: t.name.clone(),
                start_url: t.start_url.clone(),
                step_budget: t.step_budget,
                enabled: t.enabled,
            })
            .collect()
    }
}

const LOCATIONS_FORMAT: &str = r#"{"locations": [{"address": "complete address", "phone": "phone number", "source": "SOURCE"}]}"#;

/// Built-in source definitions
pub fn builtin_templates() -> Vec<WorkerTemplate> {
    vec![
        WorkerTemplate::new(
            "Google Maps",
            concat!(
                "Find {franchise} locations in {city}, {state}, {country} using Google Maps only. ",
                "The Google Maps search results are already open; read the results listed in the ",
                "side panel and do not interact with the map itself or open individual listings. ",
                "For each location, extract the exact address and phone number. ",
                "If only a single result is listed, refine the search query. ",
                "Return each location as one JSON object per line: ",
                r#"{"address": "<address>", "phone": "<phone>", "source": "Google Maps"}"#,
            ),
            "https://www.google.com/maps/search/{franchise}+{city}+{state}+{country}",
            10,
        ),
        WorkerTemplate::new(
            "Official Website",
            concat!(
                "Find {franchise} locations in {state}, {country} by visiting the official ",
                "{franchise} website only. For each location, extract the exact address and ",
                "phone number. Keep going until you have verified that the official website ",
                "lists no further locations. Return each location as one JSON object per line: ",
                r#"{"address": "<address>", "phone": "<phone>", "source": "Official Website"}"#,
            ),
            "https://www.bing.com/search?q={franchise}+official+website+{city}+{state}+{country}",
            15,
        ),
        WorkerTemplate::new(
            "Yelp",
            format!(
                "Find {{franchise}} locations in {{city}}, {{state}}, {{country}} on Yelp only; do not \
                 use results from a general web search. If a CAPTCHA blocks the page, try to work \
                 around it. For each location in {{city}}, {{state}}, {{country}}, extract the exact \
                 address and phone number. Return exactly: {} . If nothing can be found, return \
                 {{\"locations\": []}}",
                LOCATIONS_FORMAT.replace("SOURCE", "Yelp")
            ),
            "https://www.yelp.com/search?find_desc={franchise}&find_loc={city}+{state}+{country}",
            10,
        ),
        WorkerTemplate::new(
            "Yellow Pages",
            format!(
                "Find {{franchise}} locations in {{city}}, {{state}}, {{country}} on Yellow Pages \
                 only; do not use results from a general web search. For each location in \
                 {{city}}, {{state}}, {{country}}, extract the exact address and phone number. \
                 Return exactly: {}",
                LOCATIONS_FORMAT.replace("SOURCE", "Yellow Pages")
            ),
            "https://www.yellowpages.com/search?search_terms={franchise}&geo_location_terms={city}+{state}+{country}",
            10,
        ),
        WorkerTemplate::new(
            "Other Websites",
            format!(
                "Find {{franchise}} locations in {{city}}, {{state}}, {{country}} using alternative \
                 websites. Avoid Google Maps, Yelp, Yellow Pages and the official {{franchise}} \
                 website. For each location, extract the complete street address, the phone number \
                 ('N/A' when unavailable) and the readable name of the website it came from, \
                 written as a proper business name without domain suffixes (tripadvisor.com \
                 becomes 'Trip Advisor'). Visit one website at a time and collect results from at \
                 least two or three websites. Return exactly: {}",
                LOCATIONS_FORMAT.replace("SOURCE", "website name")
            ),
            "https://www.bing.com/search?q={franchise}+locations+in+{city}+{state}+{country}",
            25,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> LocationQuery {
        LocationQuery::new("El Pollo Loco", "USA", "Colorado", "Denver")
    }

    #[test]
    fn test_builtin_catalog_sources_and_budgets() {
        let catalog = Catalog::builtin();
        let budgets: Vec<(&str, u32)> = catalog
            .templates()
            .iter()
            .map(|t| (t.name.as_str(), t.step_budget))
            .collect();

        assert_eq!(
            budgets,
            vec![
                ("Google Maps", 10),
                ("Official Website", 15),
                ("Yelp", 10),
                ("Yellow Pages", 10),
                ("Other Websites", 25),
            ]
        );
    }

    #[test]
    fn test_render_substitutes_task_placeholders_verbatim() {
        let spec = Catalog::builtin().templates()[2].render(&query());
        assert!(spec.task_description.contains("El Pollo Loco locations in Denver, Colorado, USA"));
        assert!(!spec.task_description.contains("{franchise}"));
        assert!(spec.task_description.contains(r#""source": "Yelp""#));
    }

    #[test]
    fn test_render_encodes_url_values() {
        let spec = Catalog::builtin().templates()[0].render(&query());
        assert_eq!(
            spec.start_url,
            "https://www.google.com/maps/search/El+Pollo+Loco+Denver+Colorado+USA"
        );

        let template = WorkerTemplate::new("t", "task", "https://x.test/?q={franchise}", 3);
        let spec = template.render(&LocationQuery::new("A&W", "USA", "CO", "Denver"));
        assert_eq!(spec.start_url, "https://x.test/?q=A%26W");
    }

    #[test]
    fn test_specs_skip_disabled_templates() {
        let mut templates = builtin_templates();
        templates[1].enabled = false;
        let catalog = Catalog::new(templates);

        let names: Vec<String> = catalog.specs_for(&query()).into_iter().map(|s| s.name).collect();
        assert_eq!(names.len(), 4);
        assert!(!names.contains(&"Official Website".to_string()));
        assert_eq!(catalog.sources().len(), 5);
    }

    #[test]
    fn test_template_provider_carries_into_spec() {
        let mut template = WorkerTemplate::new("t", "task", "https://x.test", 2);
        template.provider = Some("openai".to_string());
        assert_eq!(template.render(&query()).provider.as_deref(), Some("openai"));
    }
}
