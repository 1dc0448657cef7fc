//! Integration tests for listing extraction using fixture files.

use price_tracker::config::ExtractConfig;
use price_tracker::diagnostics::Verdict;
use price_tracker::locate::{LocatorStrategy, StrategySet, Target};
use price_tracker::market::Market;
use price_tracker::{ExtractError, ListingExtractor, StructuredPrice};
use scraper::Html;

const NOON_FIXTURE: &str = include_str!("fixtures/noon_search.html");
const AMAZON_FIXTURE: &str = include_str!("fixtures/amazon_search.html");
const DRIFTED_FIXTURE: &str = include_str!("fixtures/drifted_markup.html");
const PRICES_MISSING_FIXTURE: &str = include_str!("fixtures/prices_missing.html");

fn extractor(market: Market) -> ListingExtractor {
    ListingExtractor::for_market(&ExtractConfig::default(), market).unwrap()
}

#[test]
fn test_noon_search_page() {
    let extraction = extractor(Market::NoonSa).extract_html(NOON_FIXTURE).unwrap();
    assert_eq!(extraction.len(), 3);

    // Discounted listing with badge and delivery lines in the price block
    let listing = &extraction.listings[0];
    assert_eq!(listing.title, "Apple MacBook Air 13-inch M2 chip 8GB RAM 256GB SSD");
    assert_eq!(listing.price.current, Some(4099.0));
    assert_eq!(listing.price.original, Some(5899.0));
    assert_eq!(listing.price.discount_percent, Some(30));
    assert_eq!(
        listing.price.raw,
        "4,099\n5,899\n30% OFF\n#2 in Notebook Laptops\nFree Delivery"
    );
    assert_eq!(listing.link.as_deref(), Some("https://www.noon.com/saudi-en/N53377204A/p/"));

    // Single price
    let listing = &extraction.listings[1];
    assert!(listing.title.starts_with("Samsung Galaxy A55"));
    assert_eq!(listing.price.current, Some(2099.0));
    assert!(listing.price.original.is_none());
    assert!(listing.price.discount_percent.is_none());

    // No title element and no text long enough to stand in for one
    let listing = &extraction.listings[2];
    assert_eq!(listing.title, "N/A");
    assert_eq!(listing.price.current, Some(1599.0));
    assert_eq!(listing.link.as_deref(), Some("https://www.noon.com/saudi-en/N12000001A/p/"));

    let report = &extraction.diagnostics;
    assert_eq!(report.container.winner_name(), Some("noon product box"));
    assert_eq!(report.container_count(), 3);
    assert_eq!(report.verdict(), Verdict::Partial);
}

#[test]
fn test_amazon_search_page() {
    let extraction = extractor(Market::AmazonSa).extract_html(AMAZON_FIXTURE).unwrap();
    assert_eq!(extraction.len(), 3);

    let listing = &extraction.listings[0];
    assert_eq!(listing.title, "Lenovo IdeaPad Slim 3 15.6 inch FHD Laptop");
    assert_eq!(listing.price.current, Some(1899.0));
    assert_eq!(listing.link.as_deref(), Some("https://www.amazon.sa/dp/B0CX23V2ZK/"));

    let listing = &extraction.listings[1];
    assert_eq!(listing.price.current, Some(3249.0));
    assert_eq!(listing.link.as_deref(), Some("https://www.amazon.sa/dp/B0D1XYZ123/"));

    // Unavailable listing keeps its title and link, with an empty price
    let listing = &extraction.listings[2];
    assert_eq!(listing.title, "Dell Inspiron 3520 Laptop");
    assert_eq!(listing.price, StructuredPrice::empty());
    assert!(listing.link.is_some());

    let report = &extraction.diagnostics;
    assert_eq!(report.container.winner_name(), Some("amazon search result"));
    assert_eq!(report.container.attempts.len(), 1);
    assert!(!report.listings[2].price_block_found());
    assert_eq!(report.verdict(), Verdict::Partial);
}

#[test]
fn test_drifted_markup_uses_fallbacks() {
    let extraction = extractor(Market::NoonAe).extract_html(DRIFTED_FIXTURE).unwrap();
    assert_eq!(extraction.len(), 3);

    let report = &extraction.diagnostics;
    assert_eq!(report.container.winner_name(), Some("article tag"));
    assert_eq!(report.container.attempts.len(), 4);
    assert!(report.container.attempts[..3].iter().all(|a| a.matches == 0));

    let watch = &extraction.listings[0];
    assert_eq!(watch.title, "Smart Watch Series 9 GPS 45mm");
    assert_eq!(watch.price.current, Some(1499.0));
    assert_eq!(watch.link.as_deref(), Some("https://www.noon.com/uae-en/N99887766A/p/"));
    assert_eq!(report.listings[0].title.winner_name(), Some("h3 heading"));
    assert_eq!(report.listings[0].price_block.winner_name(), Some("currency indicator"));
    assert_eq!(report.listings[0].link.winner_name(), Some("h3 link"));

    let earbuds = &extraction.listings[1];
    assert_eq!(earbuds.price.current, Some(349.0));
    assert_eq!(earbuds.link.as_deref(), Some("https://www.noon.com/uae-en/N11223344A/p/"));
    assert_eq!(report.listings[1].price_block.winner_name(), Some("data-price attribute"));
    assert_eq!(report.listings[1].link.winner_name(), Some("any link"));

    let stand = &extraction.listings[2];
    assert_eq!(stand.title, "Phone Stand Aluminium Adjustable");
    assert!(stand.price.current.is_none());
    assert!(stand.link.is_none());
    assert!(report.listings[2].price_block.is_miss());

    let price_stats = &report.target(Target::PriceBlock).unwrap().strategies;
    let names: Vec<&str> = price_stats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["a-price-whole", "price class", "data-price attribute", "currency indicator"]
    );
    assert_eq!(price_stats[0].attempts, 3);
    assert_eq!(price_stats[2].hits, 1);
    assert_eq!(price_stats[3].attempts, 2);
    assert_eq!(price_stats[3].hits, 1);
    assert_eq!(price_stats[3].matches, 2);

    assert_eq!(report.verdict(), Verdict::Partial);
}

#[test]
fn test_prices_missing_verdict() {
    let extraction = extractor(Market::NoonEg).extract_html(PRICES_MISSING_FIXTURE).unwrap();
    assert_eq!(extraction.len(), 2);
    assert!(extraction.listings.iter().all(|l| l.price.current.is_none()));
    assert!(extraction.listings.iter().all(|l| l.price.raw == "--"));

    let report = &extraction.diagnostics;
    assert!(report.listings.iter().all(|l| l.price_block_found() && !l.price_parsed));
    assert_eq!(report.verdict(), Verdict::PricesMissing);
}

#[test]
fn test_no_containers_verdict() {
    let html = r#"
        <html>
        <body>
            <div class="empty-state">No results found</div>
        </body>
        </html>
    "#;

    let extraction = extractor(Market::NoonSa).extract_html(html).unwrap();
    assert!(extraction.is_empty());
    assert_eq!(extraction.diagnostics.verdict(), Verdict::NoContainers);
    assert_eq!(extraction.diagnostics.container.attempts.len(), 5);
}

#[test]
fn test_null_root_is_page_error() {
    let result = extractor(Market::NoonSa).extract_all(None);
    match result {
        Err(err @ ExtractError::RootUnavailable { .. }) => assert!(err.is_page_level()),
        other => panic!("expected RootUnavailable, got {:?}", other.map(|e| e.len())),
    }
}

#[test]
fn test_extract_document_matches_extract_html() {
    let e = extractor(Market::NoonSa);
    let document = Html::parse_document(NOON_FIXTURE);
    let from_document = e.extract_document(&document).unwrap();
    let from_html = e.extract_html(NOON_FIXTURE).unwrap();
    assert_eq!(from_document.listings, from_html.listings);
}

#[test]
fn test_extraction_is_deterministic() {
    let e = extractor(Market::AmazonSa);
    let first = e.extract_html(AMAZON_FIXTURE).unwrap();
    let second = e.extract_html(AMAZON_FIXTURE).unwrap();
    assert_eq!(first.listings, second.listings);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_shared_extractor_across_threads() {
    let e = extractor(Market::NoonSa);
    let (noon, amazon) = std::thread::scope(|s| {
        let noon = s.spawn(|| e.extract_html(NOON_FIXTURE).unwrap().len());
        let amazon = s.spawn(|| e.extract_html(AMAZON_FIXTURE).unwrap().len());
        (noon.join().unwrap(), amazon.join().unwrap())
    });
    assert_eq!(noon, 3);
    assert_eq!(amazon, 3);
}

#[test]
fn test_custom_strategies_from_config() {
    let config = ExtractConfig {
        strategies: StrategySet {
            container: vec![LocatorStrategy::css("grid cell", "div.grid > div")],
            title: vec![LocatorStrategy::css("product name", "[data-qa='product-name']")],
            ..StrategySet::default()
        },
        ..ExtractConfig::default()
    };

    let e = ListingExtractor::for_market(&config, Market::NoonSa).unwrap();
    let extraction = e.extract_html(NOON_FIXTURE).unwrap();
    assert_eq!(extraction.len(), 3);
    assert_eq!(extraction.diagnostics.container.winner_name(), Some("grid cell"));
    assert_eq!(extraction.listings[2].title, "N/A");
}

#[test]
fn test_narrow_price_range_drops_amounts() {
    let mut config = ExtractConfig::default();
    config.price.max_price = 3000.0;

    let e = ListingExtractor::for_market(&config, Market::NoonSa).unwrap();
    let extraction = e.extract_html(NOON_FIXTURE).unwrap();

    // 4,099 and 5,899 are out of range, so nothing is left to decompose
    let listing = &extraction.listings[0];
    assert!(listing.price.current.is_none());
    assert!(listing.price.original.is_none());
    assert_eq!(listing.price.discount_percent, Some(30));
    assert_eq!(extraction.listings[1].price.current, Some(2099.0));
}

#[test]
fn test_skip_untitled_drops_listing() {
    let config = ExtractConfig { skip_untitled: true, ..ExtractConfig::default() };
    let e = ListingExtractor::for_market(&config, Market::NoonSa).unwrap();
    let extraction = e.extract_html(NOON_FIXTURE).unwrap();

    assert_eq!(extraction.len(), 2);
    assert!(extraction.listings.iter().all(|l| l.title != "N/A"));
    assert_eq!(extraction.diagnostics.emitted(), 2);
    assert!(extraction.diagnostics.listings[2].skipped);
}

#[test]
fn test_inline_script_is_not_a_title() {
    let html = r#"
        <html><body>
            <article>
                <script>window.__card = {"id": 12345, "track": true};</script>
                <span>Phone</span>
                <div class="price">2,099</div>
            </article>
        </body></html>
    "#;

    let extraction = extractor(Market::NoonSa).extract_html(html).unwrap();
    assert_eq!(extraction.len(), 1);
    let listing = &extraction.listings[0];
    assert_eq!(listing.title, "N/A");
    assert_eq!(listing.price.current, Some(2099.0));
    assert!(extraction.diagnostics.listings[0].title.is_miss());
}

#[test]
fn test_style_rule_does_not_hide_visible_price() {
    let html = r#"
        <html><body>
            <article>
                <h2>Wireless Earbuds Pro</h2>
                <style>.x::after { content: "SAR"; }</style>
                <span>SAR 1,299</span>
            </article>
        </body></html>
    "#;

    let extraction = extractor(Market::NoonSa).extract_html(html).unwrap();
    let listing = &extraction.listings[0];
    assert_eq!(listing.title, "Wireless Earbuds Pro");
    assert_eq!(listing.price.current, Some(1299.0));
    assert_eq!(listing.price.raw, "SAR 1,299");
    assert_eq!(
        extraction.diagnostics.listings[0].price_block.winner_name(),
        Some("currency indicator")
    );
}

#[test]
fn test_placeholder_anchor_does_not_hide_product_link() {
    let html = r##"
        <html><body>
            <article>
                <a href="#">Add to wishlist</a>
                <span>Smart Watch Series 9 GPS 45mm</span>
                <div class="price">1,499</div>
                <a href="/saudi-en/N99887766A/p/?o=abc">View</a>
            </article>
        </body></html>
    "##;

    let extraction = extractor(Market::NoonSa).extract_html(html).unwrap();
    let listing = &extraction.listings[0];
    assert_eq!(listing.link.as_deref(), Some("https://www.noon.com/saudi-en/N99887766A/p/"));
    assert_eq!(extraction.diagnostics.listings[0].link.winner_name(), Some("any link"));
}
