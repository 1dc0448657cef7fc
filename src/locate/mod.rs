//! Multi-strategy element location.
//!
//! Each target has an ordered chain of strategies. The first strategy that
//! finds at least one match wins; results are never merged across
//! strategies. Every attempt is recorded so diagnostics can show which rule
//! fired and which ones came up empty.

pub mod defaults;
pub mod strategy;

pub use defaults::StrategySet;
pub use strategy::{LocatorStrategy, Strategy, StrategyRule};

use crate::error::ExtractError;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// What a locator chain looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Container,
    Title,
    PriceBlock,
    Link,
}

impl Target {
    pub const ALL: [Target; 4] = [Target::Container, Target::Title, Target::PriceBlock, Target::Link];
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Container => write!(f, "container"),
            Target::Title => write!(f, "title"),
            Target::PriceBlock => write!(f, "price block"),
            Target::Link => write!(f, "link"),
        }
    }
}

/// A located element and the value read from it.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub element: ElementRef<'a>,
    /// Attribute value, or the element's non-blank text nodes joined by `\n`
    pub value: String,
}

impl<'a> Match<'a> {
    /// Reads the value of `element`; blank values are not matches.
    pub fn from_element(element: ElementRef<'a>, value_attr: Option<&str>) -> Option<Self> {
        if !is_rendered(element) {
            return None;
        }

        let value = match value_attr {
            Some(attr) => element.value().attr(attr)?.trim().to_string(),
            None => text_lines(element).join("\n"),
        };

        if value.is_empty() {
            None
        } else {
            Some(Self { element, value })
        }
    }

    /// The value split into trimmed, non-blank lines.
    pub fn lines(&self) -> Vec<String> {
        self.value.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect()
    }
}

/// Elements whose contents never reach the rendered page.
const UNRENDERED: [&str; 4] = ["script", "style", "noscript", "template"];

fn is_unrendered(element: ElementRef<'_>) -> bool {
    UNRENDERED.contains(&element.value().name())
}

/// False for script, style, noscript and template elements and anything inside them.
pub fn is_rendered(element: ElementRef<'_>) -> bool {
    !is_unrendered(element) && !element.ancestors().filter_map(ElementRef::wrap).any(is_unrendered)
}

/// Non-blank, trimmed text nodes below `element`, in document order.
/// Text under script, style, noscript and template elements is skipped.
pub fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    if !is_unrendered(element) {
        push_text_lines(element, &mut lines);
    }
    lines
}

fn push_text_lines(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if !is_unrendered(child) {
                push_text_lines(child, lines);
            }
        }
    }
}

/// One strategy's result during a locate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAttempt {
    pub name: String,
    pub matches: usize,
}

/// Audit trail of one locate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateTrail {
    pub target: Target,
    /// Strategies tried, in order; strategies after the winner are not tried
    pub attempts: Vec<StrategyAttempt>,
    /// Index into `attempts` of the strategy whose matches were returned
    pub winner: Option<usize>,
}

impl LocateTrail {
    fn new(target: Target) -> Self {
        Self { target, attempts: Vec::new(), winner: None }
    }

    pub fn is_miss(&self) -> bool {
        self.winner.is_none()
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner.map(|i| self.attempts[i].name.as_str())
    }

    pub fn match_count(&self) -> usize {
        self.winner.map_or(0, |i| self.attempts[i].matches)
    }
}

/// Result of a locate call.
#[derive(Debug, Clone)]
pub struct Located<'a> {
    pub matches: Vec<Match<'a>>,
    pub trail: LocateTrail,
}

impl<'a> Located<'a> {
    pub fn first(&self) -> Option<&Match<'a>> {
        self.matches.first()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Strategy chains for all targets.
pub struct Locator {
    container: Vec<Box<dyn Strategy>>,
    title: Vec<Box<dyn Strategy>>,
    price_block: Vec<Box<dyn Strategy>>,
    link: Vec<Box<dyn Strategy>>,
}

impl Locator {
    /// Creates a locator with empty chains; every target misses.
    pub fn new() -> Self {
        Self { container: Vec::new(), title: Vec::new(), price_block: Vec::new(), link: Vec::new() }
    }

    /// Compiles configured strategies into a locator.
    pub fn from_strategies(set: &StrategySet) -> Result<Self, ExtractError> {
        let mut locator = Self::new();
        for target in Target::ALL {
            for strategy in set.chain(target) {
                locator.chain_mut(target).push(strategy.compile()?);
            }
        }
        Ok(locator)
    }

    /// Appends a strategy to the end of `target`'s chain.
    pub fn add(&mut self, target: Target, strategy: impl Strategy + 'static) -> &mut Self {
        self.chain_mut(target).push(Box::new(strategy));
        self
    }

    /// Names of the strategies in `target`'s chain, in priority order.
    pub fn strategy_names(&self, target: Target) -> Vec<&str> {
        self.chain(target).iter().map(|s| s.name()).collect()
    }

    /// Finds `target` elements below `scope` using the first strategy that matches.
    pub fn locate<'a>(&self, scope: ElementRef<'a>, target: Target) -> Located<'a> {
        let mut trail = LocateTrail::new(target);

        for strategy in self.chain(target) {
            let matches = strategy.find(scope);
            trail.attempts.push(StrategyAttempt {
                name: strategy.name().to_string(),
                matches: matches.len(),
            });

            if !matches.is_empty() {
                trace!("{}: '{}' matched {} element(s)", target, strategy.name(), matches.len());
                trail.winner = Some(trail.attempts.len() - 1);
                return Located { matches, trail };
            }
        }

        trace!("{}: no strategy matched ({} tried)", target, trail.attempts.len());
        Located { matches: Vec::new(), trail }
    }

    fn chain(&self, target: Target) -> &[Box<dyn Strategy>] {
        match target {
            Target::Container => &self.container,
            Target::Title => &self.title,
            Target::PriceBlock => &self.price_block,
            Target::Link => &self.link,
        }
    }

    fn chain_mut(&mut self, target: Target) -> &mut Vec<Box<dyn Strategy>> {
        match target {
            Target::Container => &mut self.container,
            Target::Title => &mut self.title,
            Target::PriceBlock => &mut self.price_block,
            Target::Link => &mut self.link,
        }
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Locator`] with custom strategies.
pub struct LocatorBuilder {
    locator: Locator,
}

impl LocatorBuilder {
    pub fn new() -> Self {
        Self { locator: Locator::new() }
    }

    pub fn strategy(mut self, target: Target, strategy: impl Strategy + 'static) -> Self {
        self.locator.add(target, strategy);
        self
    }

    pub fn build(self) -> Locator {
        self.locator
    }
}

impl Default for LocatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
