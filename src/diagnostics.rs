//! Operator-facing diagnostics for one page extraction.
//!
//! The report only aggregates what the locator and decomposer recorded; it
//! never changes extracted listings. Its main job is telling "no containers
//! found" (page load or markup drift) apart from "containers found but
//! prices absent" (a stale price selector).

use crate::locate::{LocateTrail, Target};
use crate::price::PriceAmbiguity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to one located container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingOutcome {
    /// Zero-based position of the container on the page
    pub index: usize,
    pub title: LocateTrail,
    pub price_block: LocateTrail,
    pub link: LocateTrail,
    /// A current price was decomposed from the price block
    pub price_parsed: bool,
    pub ambiguities: Vec<PriceAmbiguity>,
    /// Listing was dropped from the output (untitled listings with `skip_untitled`)
    pub skipped: bool,
}

impl ListingOutcome {
    pub fn title_found(&self) -> bool {
        !self.title.is_miss()
    }

    pub fn price_block_found(&self) -> bool {
        !self.price_block.is_miss()
    }

    pub fn link_found(&self) -> bool {
        !self.link.is_miss()
    }
}

/// Aggregated results for one strategy across the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyStats {
    pub name: String,
    /// Times the strategy was tried
    pub attempts: usize,
    /// Times it was the winning strategy
    pub hits: usize,
    /// Elements matched over all hits
    pub matches: usize,
}

/// Aggregated locator results for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub target: Target,
    /// Strategies in chain order
    pub strategies: Vec<StrategyStats>,
    /// Locate calls that found something
    pub located: usize,
    /// Locate calls where every strategy came up empty
    pub missed: usize,
}

impl TargetSummary {
    fn from_trails<'a>(target: Target, trails: impl IntoIterator<Item = &'a LocateTrail>) -> Self {
        let mut summary = Self { target, strategies: Vec::new(), located: 0, missed: 0 };

        for trail in trails {
            if trail.is_miss() {
                summary.missed += 1;
            } else {
                summary.located += 1;
            }

            for (i, attempt) in trail.attempts.iter().enumerate() {
                let won = trail.winner == Some(i);
                let pos = match summary.strategies.iter().position(|s| s.name == attempt.name) {
                    Some(pos) => pos,
                    None => {
                        summary.strategies.push(StrategyStats {
                            name: attempt.name.clone(),
                            attempts: 0,
                            hits: 0,
                            matches: 0,
                        });
                        summary.strategies.len() - 1
                    }
                };
                let stats = &mut summary.strategies[pos];
                stats.attempts += 1;
                if won {
                    stats.hits += 1;
                    stats.matches += attempt.matches;
                }
            }
        }

        summary
    }
}

/// Overall classification of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No container strategy matched: the page did not load or the markup drifted.
    NoContainers,
    /// Containers were found but none yielded a price: the price chain is stale.
    PricesMissing,
    /// Some listings lack a title or a price.
    Partial,
    Healthy,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NoContainers => write!(f, "no containers found (page load or markup drift)"),
            Verdict::PricesMissing => {
                write!(f, "containers found but prices absent (price selector issue)")
            }
            Verdict::Partial => write!(f, "partial: some listings lack a title or price"),
            Verdict::Healthy => write!(f, "healthy"),
        }
    }
}

/// Diagnostics for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub container: LocateTrail,
    pub listings: Vec<ListingOutcome>,
    /// One summary per target, in [`Target::ALL`] order
    pub targets: Vec<TargetSummary>,
}

impl DiagnosticsReport {
    /// Aggregates the container trail and per-listing outcomes.
    pub fn from_outcomes(container: LocateTrail, listings: Vec<ListingOutcome>) -> Self {
        let targets = vec![
            TargetSummary::from_trails(Target::Container, std::iter::once(&container)),
            TargetSummary::from_trails(Target::Title, listings.iter().map(|l| &l.title)),
            TargetSummary::from_trails(Target::PriceBlock, listings.iter().map(|l| &l.price_block)),
            TargetSummary::from_trails(Target::Link, listings.iter().map(|l| &l.link)),
        ];

        Self { container, listings, targets }
    }

    /// Number of containers located on the page.
    pub fn container_count(&self) -> usize {
        self.container.match_count()
    }

    /// Number of listings that made it into the output.
    pub fn emitted(&self) -> usize {
        self.listings.iter().filter(|l| !l.skipped).count()
    }

    pub fn target(&self, target: Target) -> Option<&TargetSummary> {
        self.targets.iter().find(|t| t.target == target)
    }

    pub fn verdict(&self) -> Verdict {
        if self.listings.is_empty() {
            return Verdict::NoContainers;
        }
        if !self.listings.iter().any(|l| l.price_parsed) {
            return Verdict::PricesMissing;
        }
        if self.listings.iter().any(|l| !l.price_parsed || !l.title_found()) {
            return Verdict::Partial;
        }
        Verdict::Healthy
    }
}

impl fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verdict:    {}", self.verdict())?;
        writeln!(
            f,
            "Containers: {} via {}",
            self.container_count(),
            self.container.winner_name().unwrap_or("no strategy")
        )?;
        writeln!(f, "Listings:   {} emitted, {} skipped", self.emitted(), self.listings.len() - self.emitted())?;
        if !self.listings.is_empty() {
            let total = self.listings.len();
            let count = |found: fn(&ListingOutcome) -> bool| self.listings.iter().filter(|l| found(l)).count();
            writeln!(
                f,
                "Found:      {}/{} titles, {}/{} price blocks, {}/{} links",
                count(ListingOutcome::title_found),
                total,
                count(ListingOutcome::price_block_found),
                total,
                count(ListingOutcome::link_found),
                total
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Strategies:")?;
        for summary in &self.targets {
            writeln!(f, "  {} ({} located, {} missed)", summary.target, summary.located, summary.missed)?;
            for stats in &summary.strategies {
                writeln!(
                    f,
                    "    {:<28} tried {:>3}  hit {:>3}  matches {:>4}",
                    stats.name, stats.attempts, stats.hits, stats.matches
                )?;
            }
        }

        if self.listings.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Per listing:")?;
        for listing in &self.listings {
            let price = match (listing.price_block.winner_name(), listing.price_parsed) {
                (Some(name), true) => name.to_string(),
                (Some(name), false) => format!("{} (no amount)", name),
                (None, _) => "MISS".to_string(),
            };
            write!(
                f,
                "  #{:<3} title: {:<16} price: {:<24} link: {}",
                listing.index + 1,
                listing.title.winner_name().unwrap_or("MISS"),
                price,
                listing.link.winner_name().unwrap_or("MISS"),
            )?;
            if listing.skipped {
                write!(f, "  [skipped]")?;
            }
            for note in &listing.ambiguities {
                write!(f, "  [{}]", describe(note))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn describe(note: &PriceAmbiguity) -> String {
    match note {
        PriceAmbiguity::ExtraAmounts { count } => format!("{} amounts", count),
        PriceAmbiguity::NoGreaterOriginal => "no original above first amount".to_string(),
        PriceAmbiguity::DiscountMismatch { explicit, derived } => {
            format!("discount {}% vs derived {}%", explicit, derived)
        }
    }
}
