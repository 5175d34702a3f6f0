use scraper::{Html, Selector};

use crate::clean;

/// Per-page extraction result: three independent selector sweeps, one per
/// field. The sweeps are not grouped per product tile, so the three lists
/// are correlated only by position.
pub struct PageFields {
    pub titles: Vec<String>,
    pub prices: Vec<String>,
    pub ratings: Vec<u8>,
}

/// Extract titles (`h3` text, as truncated by the site), raw price strings
/// (`p.price_color`) and mapped ratings (`p.star-rating` class lists) from
/// one listing page.
pub fn extract_fields(html: &str) -> PageFields {
    let doc = Html::parse_document(html);
    let title_sel = Selector::parse("h3").unwrap();
    let price_sel = Selector::parse("p.price_color").unwrap();
    let rating_sel = Selector::parse("p.star-rating").unwrap();

    let titles = doc
        .select(&title_sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();

    let prices = doc
        .select(&price_sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();

    let ratings = doc
        .select(&rating_sel)
        .map(|el| {
            let classes: Vec<&str> = el
                .value()
                .attr("class")
                .map(|c| c.split_whitespace().collect())
                .unwrap_or_default();
            clean::rating_value(&classes)
        })
        .collect();

    PageFields {
        titles,
        prices,
        ratings,
    }
}

/// Text of the first `h1` on the page, if any.
pub fn first_heading(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let h1 = Selector::parse("h1").unwrap();
    doc.select(&h1)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn travel_fixture_fields() {
        let fields = extract_fields(&fixture("travel"));
        assert_eq!(fields.titles, vec!["Book A ...", "Book B"]);
        assert_eq!(fields.prices, vec!["£10.00", "£50.00"]);
        assert_eq!(fields.ratings, vec![2, 5]);
    }

    #[test]
    fn travel_fixture_heading() {
        assert_eq!(first_heading(&fixture("travel")).as_deref(), Some("Travel"));
    }

    #[test]
    fn sweeps_are_independent_per_field() {
        // A tile with no price element shortens only the price sweep; the
        // three lists silently desynchronize from that point on.
        let fields = extract_fields(&fixture("missing_price"));
        assert_eq!(fields.titles.len(), 3);
        assert_eq!(fields.prices.len(), 2);
        assert_eq!(fields.ratings.len(), 3);
    }

    #[test]
    fn rating_class_order_is_positional() {
        let html = r#"<html><body>
            <p class="star-rating Four">x</p>
            <p class="star-rating">x</p>
        </body></html>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.ratings, vec![4, 0]);
    }

    #[test]
    fn empty_page_yields_empty_columns() {
        let fields = extract_fields("<html><body></body></html>");
        assert!(fields.titles.is_empty());
        assert!(fields.prices.is_empty());
        assert!(fields.ratings.is_empty());
    }
}
