use outline_logging::outline_warn;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::html::parse_selector;
use crate::AdapterError;

const DEFAULT_ROLE_ATTRIBUTE: &str = "data-message-author-role";
const DEFAULT_MARKDOWN_SELECTOR: &str = ".markdown";

/// One step of the role classification chain. Evaluated in declaration order;
/// the first rule producing a role wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleRule {
    /// Role attribute on the node, or on its first descendant carrying one.
    RoleAttribute,
    /// A node classed `bubble_class` is assistant when its only element child is
    /// rendered markdown, user otherwise.
    MarkdownBubble { bubble_class: String },
    /// "user" / "assistant" / "bot" substrings in the class list.
    ClassName,
    /// A rendered-markdown descendant implies assistant.
    MarkdownChild,
    /// Even positions are user, odd are assistant.
    Alternation,
}

/// Per-host description of how to find and classify turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Host names served by this adapter, without a `www.` prefix.
    pub hosts: Vec<String>,
    pub selectors: Vec<String>,
    #[serde(default = "default_role_rules")]
    pub role_rules: Vec<RoleRule>,
    #[serde(default = "default_role_attribute")]
    pub role_attribute: String,
    #[serde(default = "default_markdown_selector")]
    pub markdown_selector: String,
    /// Preview sources, highest priority first.
    #[serde(default = "default_content_selectors")]
    pub content_selectors: Vec<String>,
    /// Host content containers that must yield space to the open panel.
    #[serde(default)]
    pub reflow_selectors: Vec<String>,
}

fn default_role_rules() -> Vec<RoleRule> {
    vec![
        RoleRule::RoleAttribute,
        RoleRule::ClassName,
        RoleRule::MarkdownChild,
        RoleRule::Alternation,
    ]
}

fn default_role_attribute() -> String {
    DEFAULT_ROLE_ATTRIBUTE.to_string()
}

fn default_markdown_selector() -> String {
    DEFAULT_MARKDOWN_SELECTOR.to_string()
}

fn default_content_selectors() -> Vec<String> {
    vec![".markdown".to_string(), ".whitespace-pre-wrap".to_string()]
}

impl AdapterConfig {
    pub fn name(&self) -> &str {
        self.hosts.first().map(String::as_str).unwrap_or("<unnamed>")
    }

    pub fn has_rule(&self, rule: &RoleRule) -> bool {
        self.role_rules.contains(rule)
    }

    /// Checks that every selector parses and at least one turn selector exists.
    pub fn validate(&self) -> Result<(), AdapterError> {
        if self.selectors.is_empty() {
            return Err(AdapterError::EmptySelectors {
                host: self.name().to_string(),
            });
        }
        let all = self
            .selectors
            .iter()
            .chain(self.content_selectors.iter())
            .chain(self.reflow_selectors.iter())
            .chain(std::iter::once(&self.markdown_selector));
        for selector in all {
            parse_selector(selector)?;
        }
        Ok(())
    }

    fn chatgpt() -> Self {
        Self {
            hosts: vec!["chatgpt.com".to_string(), "chat.openai.com".to_string()],
            // The role div sits inside the article; outermost-wins keeps the article.
            selectors: vec![
                "article".to_string(),
                "[data-message-author-role]".to_string(),
            ],
            role_rules: default_role_rules(),
            role_attribute: default_role_attribute(),
            markdown_selector: default_markdown_selector(),
            content_selectors: default_content_selectors(),
            reflow_selectors: vec![
                "main".to_string(),
                "#thread".to_string(),
                "#thread-bottom-container".to_string(),
            ],
        }
    }

    fn deepseek() -> Self {
        Self {
            hosts: vec!["chat.deepseek.com".to_string()],
            selectors: vec![".ds-message".to_string()],
            role_rules: vec![
                RoleRule::RoleAttribute,
                RoleRule::MarkdownBubble {
                    bubble_class: "ds-message".to_string(),
                },
                RoleRule::ClassName,
                RoleRule::MarkdownChild,
                RoleRule::Alternation,
            ],
            role_attribute: default_role_attribute(),
            markdown_selector: ".ds-markdown".to_string(),
            content_selectors: vec![".ds-markdown".to_string()],
            reflow_selectors: vec![
                "#root".to_string(),
                "div[class*=\"chat-container\"]".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AdapterTable {
    adapters: Vec<AdapterConfig>,
}

/// Host-name keyed lookup of adapter configurations.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    adapters: Vec<AdapterConfig>,
}

impl AdapterRegistry {
    pub fn new(adapters: Vec<AdapterConfig>) -> Self {
        Self { adapters }
    }

    /// Adapters for the supported chat sites.
    pub fn builtin() -> Self {
        Self::new(vec![AdapterConfig::chatgpt(), AdapterConfig::deepseek()])
    }

    /// Loads a table of the form `(adapters: [ (hosts: [...], selectors: [...]) ])`.
    ///
    /// Adapters that fail validation are skipped with a warning.
    pub fn from_ron(source: &str) -> Result<Self, AdapterError> {
        let table: AdapterTable =
            ron::from_str(source).map_err(|err| AdapterError::Parse(err.to_string()))?;
        let adapters = table
            .adapters
            .into_iter()
            .filter(|adapter| match adapter.validate() {
                Ok(()) => true,
                Err(err) => {
                    outline_warn!("Skipping adapter {}: {}", adapter.name(), err);
                    false
                }
            })
            .collect();
        Ok(Self { adapters })
    }

    pub fn to_ron(&self) -> Result<String, AdapterError> {
        let table = AdapterTable {
            adapters: self.adapters.clone(),
        };
        ron::ser::to_string_pretty(&table, ron::ser::PrettyConfig::new())
            .map_err(|err| AdapterError::Parse(err.to_string()))
    }

    pub fn adapters(&self) -> &[AdapterConfig] {
        &self.adapters
    }

    /// Finds the adapter for a host name or a full page URL.
    pub fn resolve(&self, host_or_url: &str) -> Option<&AdapterConfig> {
        let host = normalize_host(host_or_url)?;
        self.adapters
            .iter()
            .find(|adapter| adapter.hosts.iter().any(|h| h.eq_ignore_ascii_case(&host)))
    }
}

fn normalize_host(host_or_url: &str) -> Option<String> {
    let trimmed = host_or_url.trim();
    let host = if trimmed.contains("://") {
        Url::parse(trimmed).ok()?.host_str()?.to_string()
    } else {
        trimmed.to_string()
    };
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::normalize_host;

    #[test]
    fn host_normalization_handles_urls_and_prefixes() {
        assert_eq!(
            normalize_host("https://www.ChatGPT.com/c/123?x=1").as_deref(),
            Some("chatgpt.com")
        );
        assert_eq!(normalize_host("chat.openai.com").as_deref(), Some("chat.openai.com"));
        assert_eq!(normalize_host("  "), None);
        assert_eq!(normalize_host("not a url://"), None);
    }
}
