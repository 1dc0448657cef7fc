//! Output formatting for listings (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::diagnostics::DiagnosticsReport;
use crate::extract::models::format_amount;
use crate::extract::ListingRecord;
use crate::market::Market;

/// Formats listings for output.
pub struct Formatter {
    format: OutputFormat,
    currency: Option<String>,
    platform: Option<String>,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format, currency: None, platform: None }
    }

    /// Labels prices with the market's currency and fills the CSV platform column.
    pub fn with_market(mut self, market: Market) -> Self {
        self.currency = Some(market.currency().to_string());
        self.platform = Some(market.platform().to_string());
        self
    }

    /// Formats a single listing.
    pub fn format_listing(&self, listing: &ListingRecord) -> String {
        match self.format {
            OutputFormat::Json => self.json_single(listing),
            OutputFormat::Table => self.table_single(listing),
            OutputFormat::Markdown => self.markdown_single(listing),
            OutputFormat::Csv => self.csv_listings(std::slice::from_ref(listing)),
        }
    }

    /// Formats multiple listings.
    pub fn format_listings(&self, listings: &[ListingRecord]) -> String {
        if listings.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No listings found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_listings(listings),
            OutputFormat::Table => self.table_listings(listings),
            OutputFormat::Markdown => self.markdown_listings(listings),
            OutputFormat::Csv => self.csv_listings(listings),
        }
    }

    /// Formats a diagnostics report: JSON for JSON output, text otherwise.
    pub fn format_diagnostics(&self, report: &DiagnosticsReport) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Markdown => format!("```text\n{}```", report),
            _ => report.to_string(),
        }
    }

    fn money(&self, amount: f64) -> String {
        match &self.currency {
            Some(currency) => format!("{} {}", currency, format_amount(amount)),
            None => format_amount(amount),
        }
    }

    // JSON formatting

    fn json_single(&self, listing: &ListingRecord) -> String {
        serde_json::to_string_pretty(listing).unwrap_or_else(|_| "{}".to_string())
    }

    fn json_listings(&self, listings: &[ListingRecord]) -> String {
        serde_json::to_string_pretty(listings).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_single(&self, listing: &ListingRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Title:    {}", listing.title));

        match listing.price.current {
            Some(current) => lines.push(format!("Price:    {}", self.money(current))),
            None => lines.push("Price:    N/A".to_string()),
        }
        if let Some(original) = listing.price.original {
            lines.push(format!("Was:      {}", self.money(original)));
        }
        if let Some(discount) = listing.price.discount_percent {
            lines.push(format!("Discount: {}%", discount));
        }

        lines.push(format!("Link:     {}", listing.link.as_deref().unwrap_or("N/A")));

        if !listing.price.raw.is_empty() {
            lines.push(format!("Raw:      {}", listing.price.raw.replace('\n', " | ")));
        }

        lines.join("\n")
    }

    fn table_listings(&self, listings: &[ListingRecord]) -> String {
        let index_width = 4;
        let price_width = 14;
        let off_width = 4;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<index_width$}  {:>price_width$}  {:>price_width$}  {:>off_width$}  {}",
            "#", "Price", "Was", "Off", "Title"
        ));
        lines.push(format!(
            "{:-<index_width$}  {:-<price_width$}  {:-<price_width$}  {:-<off_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for (i, listing) in listings.iter().enumerate() {
            let price = listing.price.current.map(|p| self.money(p)).unwrap_or_else(|| "N/A".to_string());
            let original = listing.price.original.map(|p| self.money(p)).unwrap_or_default();
            let off = listing.price.discount_percent.map(|d| format!("{}%", d)).unwrap_or_default();

            lines.push(format!(
                "{:<index_width$}  {:>price_width$}  {:>price_width$}  {:>off_width$}  {}",
                i + 1,
                price,
                original,
                off,
                truncate(&listing.title, title_width)
            ));
        }

        lines.push(String::new());
        let priced = listings.iter().filter(|l| l.price.has_price()).count();
        lines.push(format!("Total: {} listings ({} with a price)", listings.len(), priced));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_single(&self, listing: &ListingRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", listing.title));
        lines.push(String::new());

        match (listing.price.current, listing.price.original) {
            (Some(current), Some(original)) => lines.push(format!(
                "- **Price:** {} ~~{}~~",
                self.money(current),
                self.money(original)
            )),
            (Some(current), None) => lines.push(format!("- **Price:** {}", self.money(current))),
            (None, _) => lines.push("- **Price:** N/A".to_string()),
        }

        if let Some(discount) = listing.price.discount_percent {
            lines.push(format!("- **Discount:** {}%", discount));
        }

        if let Some(link) = &listing.link {
            lines.push(format!("- **Link:** [View listing]({})", link));
        }

        lines.join("\n")
    }

    fn markdown_listings(&self, listings: &[ListingRecord]) -> String {
        let mut lines = Vec::new();

        lines.push("| # | Price | Was | Off | Title |".to_string());
        lines.push("|---|-------|-----|-----|-------|".to_string());

        for (i, listing) in listings.iter().enumerate() {
            let price = listing.price.current.map(|p| self.money(p)).unwrap_or_else(|| "N/A".to_string());
            let original =
                listing.price.original.map(|p| format!("~~{}~~", self.money(p))).unwrap_or_default();
            let off = listing.price.discount_percent.map(|d| format!("{}%", d)).unwrap_or_default();

            let title = truncate(&listing.title, 40).replace('|', "\\|");
            let title = match &listing.link {
                Some(link) => format!("[{}]({})", title, link),
                None => title,
            };

            lines.push(format!("| {} | {} | {} | {} | {} |", i + 1, price, original, off, title));
        }

        lines.push(String::new());
        lines.push(format!("*{} listings found*", listings.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "platform,title,current,original,discount_percent,price_raw,link".to_string()
    }

    fn csv_listings(&self, listings: &[ListingRecord]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());
        let platform = self.platform.as_deref().unwrap_or_default();

        for listing in listings {
            let current = listing.price.current.map(|p| p.to_string()).unwrap_or_default();
            let original = listing.price.original.map(|p| p.to_string()).unwrap_or_default();
            let discount =
                listing.price.discount_percent.map(|d| d.to_string()).unwrap_or_default();

            lines.push(format!(
                "{},{},{},{},{},{},{}",
                Self::csv_escape(platform),
                Self::csv_escape(&listing.title),
                current,
                original,
                discount,
                Self::csv_escape(&listing.price.raw),
                listing.link.as_deref().map(Self::csv_escape).unwrap_or_default()
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Shortens `s` to at most `max` characters, ending in "..." when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
