use std::fmt;

use anyhow::{ensure, Result};
use serde::Serialize;

use crate::clean;
use crate::scrape::RawColumns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceRange {
    Cheap,
    Medium,
    Expensive,
}

impl PriceRange {
    pub const ALL: [PriceRange; 3] = [PriceRange::Cheap, PriceRange::Medium, PriceRange::Expensive];
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceRange::Cheap => write!(f, "Cheap"),
            PriceRange::Medium => write!(f, "Medium"),
            PriceRange::Expensive => write!(f, "Expensive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatingCategory {
    Low,
    Average,
    High,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 3] = [
        RatingCategory::Low,
        RatingCategory::Average,
        RatingCategory::High,
    ];
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingCategory::Low => write!(f, "Low"),
            RatingCategory::Average => write!(f, "Average"),
            RatingCategory::High => write!(f, "High"),
        }
    }
}

/// One book in scrape order. The index is 1-based and never written to the
/// CSV; titles are not unique, so position is the only identity a row has.
#[derive(Debug, Clone, Serialize)]
pub struct BookRow {
    #[serde(skip)]
    pub index: usize,
    #[serde(rename = "Book_Name")]
    pub name: String,
    #[serde(rename = "Book_Price")]
    pub price: Option<f64>,
    #[serde(rename = "Book_Rating")]
    pub rating: u8,
    #[serde(rename = "Price_Range")]
    pub price_range: Option<PriceRange>,
    #[serde(rename = "Rating_Category")]
    pub rating_category: RatingCategory,
}

pub struct BookTable {
    rows: Vec<BookRow>,
}

impl BookTable {
    /// Zip the three cleaned columns into rows. The columns are only
    /// correlated by position, so unequal lengths mean the data already
    /// desynchronized somewhere upstream and assembling rows would be
    /// meaningless.
    pub fn from_columns(
        names: Vec<String>,
        prices: Vec<Option<f64>>,
        ratings: Vec<u8>,
    ) -> Result<Self> {
        ensure!(
            names.len() == prices.len() && names.len() == ratings.len(),
            "column length mismatch: {} names, {} prices, {} ratings",
            names.len(),
            prices.len(),
            ratings.len()
        );

        let rows = names
            .into_iter()
            .zip(prices)
            .zip(ratings)
            .enumerate()
            .map(|(i, ((name, price), rating))| BookRow {
                index: i + 1,
                name,
                price,
                rating,
                price_range: None,
                rating_category: rating_category(rating),
            })
            .collect();

        Ok(BookTable { rows })
    }

    /// Fill in both bucket columns. The Expensive upper bound is the
    /// maximum observed price plus one, so it moves run to run; the 25/45
    /// cut points are fixed.
    pub fn derive_features(&mut self) {
        let upper = self
            .rows
            .iter()
            .filter_map(|r| r.price)
            .fold(None, |acc: Option<f64>, p| {
                Some(acc.map_or(p, |m| m.max(p)))
            })
            .map(|max| max + 1.0);

        for row in &mut self.rows {
            row.price_range = match (row.price, upper) {
                (Some(price), Some(upper)) => price_range(price, upper),
                _ => None,
            };
            row.rating_category = rating_category(row.rating);
        }
    }

    pub fn rows(&self) -> &[BookRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn head(&self, n: usize) -> &[BookRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Clean the raw crawl columns and assemble the final table with both
/// derived features in place.
pub fn build_table(raw: RawColumns) -> Result<BookTable> {
    let names = raw.titles.iter().map(|t| clean::clean_title(t)).collect();
    let prices = raw.prices.iter().map(|p| clean::parse_price(p)).collect();

    let mut table = BookTable::from_columns(names, prices, raw.ratings)?;
    table.derive_features();
    Ok(table)
}

/// Half-open lower-inclusive intervals: [0,25) Cheap, [25,45) Medium,
/// [45,upper) Expensive. A value on a cut point goes to the upper bucket.
fn price_range(price: f64, upper: f64) -> Option<PriceRange> {
    if price < 0.0 {
        None
    } else if price < 25.0 {
        Some(PriceRange::Cheap)
    } else if price < 45.0 {
        Some(PriceRange::Medium)
    } else if price < upper {
        Some(PriceRange::Expensive)
    } else {
        None
    }
}

/// [0,2.5) Low, [2.5,3.5) Average, [3.5,5.5) High over the integer rating.
/// A rating of 0 means "could not determine" as often as "zero stars" and
/// lands in Low either way.
fn rating_category(rating: u8) -> RatingCategory {
    let r = f64::from(rating);
    if r < 2.5 {
        RatingCategory::Low
    } else if r < 3.5 {
        RatingCategory::Average
    } else {
        RatingCategory::High
    }
}

// ── Tests ──
