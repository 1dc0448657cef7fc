//! Locator strategies: configurable rules and their compiled matchers.

use crate::error::ExtractError;
use crate::locate::{is_rendered, Match};
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

/// A rule for finding elements below a scope element.
///
/// Implementations must be pure: the same scope always yields the same
/// matches, and a miss is an empty vector.
pub trait Strategy: Send + Sync {
    /// Name reported in diagnostics.
    fn name(&self) -> &str;

    /// Returns every match below `scope`, in document order.
    fn find<'a>(&self, scope: ElementRef<'a>) -> Vec<Match<'a>>;
}

/// Configured form of a strategy, as read from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorStrategy {
    pub name: String,
    #[serde(flatten)]
    pub rule: StrategyRule,
    /// Read the value from this attribute instead of the element's text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_attr: Option<String>,
}

/// How a strategy selects elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyRule {
    /// Any CSS selector: attribute match, class substring, tag name.
    Css { selector: String },
    /// Elements whose own text is longer than `min_chars` characters.
    OwnTextLength {
        #[serde(default = "any_element")]
        selector: String,
        min_chars: usize,
    },
    /// Elements whose own text contains one of `needles`.
    OwnTextContains {
        #[serde(default = "any_element")]
        selector: String,
        needles: Vec<String>,
    },
    /// The scope element itself, when it carries `attr`.
    ScopeAttr { attr: String },
}

fn any_element() -> String {
    "*".to_string()
}

impl LocatorStrategy {
    pub fn css(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self::new(name, StrategyRule::Css { selector: selector.into() })
    }

    pub fn own_text_length(
        name: impl Into<String>,
        selector: impl Into<String>,
        min_chars: usize,
    ) -> Self {
        Self::new(name, StrategyRule::OwnTextLength { selector: selector.into(), min_chars })
    }

    pub fn own_text_contains(
        name: impl Into<String>,
        selector: impl Into<String>,
        needles: &[&str],
    ) -> Self {
        Self::new(
            name,
            StrategyRule::OwnTextContains {
                selector: selector.into(),
                needles: needles.iter().map(|n| n.to_string()).collect(),
            },
        )
    }

    pub fn scope_attr(name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::new(name, StrategyRule::ScopeAttr { attr: attr.into() })
    }

    /// Takes match values from `attr` (e.g. `href`) instead of text.
    pub fn with_value_attr(mut self, attr: impl Into<String>) -> Self {
        self.value_attr = Some(attr.into());
        self
    }

    fn new(name: impl Into<String>, rule: StrategyRule) -> Self {
        Self { name: name.into(), rule, value_attr: None }
    }

    /// Compiles the rule into a matcher, validating its selector.
    pub fn compile(&self) -> Result<Box<dyn Strategy>, ExtractError> {
        let value_attr = self.value_attr.clone();
        let strategy: Box<dyn Strategy> = match &self.rule {
            StrategyRule::Css { selector } => Box::new(CssStrategy {
                name: self.name.clone(),
                selector: self.parse_selector(selector)?,
                value_attr,
            }),
            StrategyRule::OwnTextLength { selector, min_chars } => Box::new(OwnTextStrategy {
                name: self.name.clone(),
                selector: self.parse_selector(selector)?,
                test: OwnTextTest::LongerThan(*min_chars),
                value_attr,
            }),
            StrategyRule::OwnTextContains { selector, needles } => Box::new(OwnTextStrategy {
                name: self.name.clone(),
                selector: self.parse_selector(selector)?,
                test: OwnTextTest::Contains(needles.clone()),
                value_attr,
            }),
            StrategyRule::ScopeAttr { attr } => {
                Box::new(ScopeAttrStrategy { name: self.name.clone(), attr: attr.clone() })
            }
        };
        Ok(strategy)
    }

    fn parse_selector(&self, selector: &str) -> Result<Selector, ExtractError> {
        Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
            strategy: self.name.clone(),
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Matches descendants by CSS selector.
pub struct CssStrategy {
    name: String,
    selector: Selector,
    value_attr: Option<String>,
}

impl Strategy for CssStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn find<'a>(&self, scope: ElementRef<'a>) -> Vec<Match<'a>> {
        scope
            .select(&self.selector)
            .filter_map(|el| Match::from_element(el, self.value_attr.as_deref()))
            .collect()
    }
}

enum OwnTextTest {
    LongerThan(usize),
    Contains(Vec<String>),
}

/// Matches descendants by their own (direct) text content.
pub struct OwnTextStrategy {
    name: String,
    selector: Selector,
    test: OwnTextTest,
    value_attr: Option<String>,
}

impl Strategy for OwnTextStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn find<'a>(&self, scope: ElementRef<'a>) -> Vec<Match<'a>> {
        scope
            .select(&self.selector)
            .filter(|el| is_rendered(*el))
            .filter(|el| {
                let text = own_text(*el);
                match &self.test {
                    OwnTextTest::LongerThan(min) => text.chars().count() > *min,
                    OwnTextTest::Contains(needles) => {
                        needles.iter().any(|n| !n.is_empty() && text.contains(n.as_str()))
                    }
                }
            })
            .filter_map(|el| Match::from_element(el, self.value_attr.as_deref()))
            .collect()
    }
}

/// Matches the scope element itself by attribute.
pub struct ScopeAttrStrategy {
    name: String,
    attr: String,
}

impl Strategy for ScopeAttrStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn find<'a>(&self, scope: ElementRef<'a>) -> Vec<Match<'a>> {
        Match::from_element(scope, Some(&self.attr)).into_iter().collect()
    }
}

/// Direct text children of `element`, whitespace-normalised.
/// Empty for elements that are not rendered.
pub fn own_text(element: ElementRef<'_>) -> String {
    if !is_rendered(element) {
        return String::new();
    }

    let mut words = Vec::new();
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}
