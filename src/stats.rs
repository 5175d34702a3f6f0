use crate::table::{BookTable, PriceRange, RatingCategory};

/// Descriptive statistics over the non-missing values of one numeric
/// column, pandas-describe style.
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

pub fn describe(values: &[f64]) -> Option<Describe> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    // Sample standard deviation; undefined for a single observation.
    let std = if n < 2 {
        f64::NAN
    } else {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (n - 1) as f64).sqrt()
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(Describe {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolation quantile over an already sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Count per price range, all three buckets, descending by count.
pub fn price_range_counts(table: &BookTable) -> Vec<(PriceRange, usize)> {
    let mut counts: Vec<(PriceRange, usize)> = PriceRange::ALL
        .iter()
        .map(|bucket| {
            let count = table
                .rows()
                .iter()
                .filter(|r| r.price_range == Some(*bucket))
                .count();
            (*bucket, count)
        })
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Count per rating category, all three buckets, descending by count.
pub fn rating_category_counts(table: &BookTable) -> Vec<(RatingCategory, usize)> {
    let mut counts: Vec<(RatingCategory, usize)> = RatingCategory::ALL
        .iter()
        .map(|bucket| {
            let count = table
                .rows()
                .iter()
                .filter(|r| r.rating_category == *bucket)
                .count();
            (*bucket, count)
        })
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Book count per star rating 0..=5.
pub fn star_rating_counts(table: &BookTable) -> [usize; 6] {
    let mut counts = [0usize; 6];
    for row in table.rows() {
        counts[usize::from(row.rating.min(5))] += 1;
    }
    counts
}

/// Mean rating per price range, in bucket order; None for an empty bucket.
pub fn mean_rating_by_price_range(table: &BookTable) -> Vec<(PriceRange, Option<f64>)> {
    PriceRange::ALL
        .iter()
        .map(|bucket| {
            let ratings: Vec<f64> = table
                .rows()
                .iter()
                .filter(|r| r.price_range == Some(*bucket))
                .map(|r| f64::from(r.rating))
                .collect();
            let mean = if ratings.is_empty() {
                None
            } else {
                Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
            };
            (*bucket, mean)
        })
        .collect()
}

// ── Console report ──

pub fn print_head(table: &BookTable, n: usize) {
    println!(
        "{:>4} | {:<40} | {:>10} | {:>6} | {:<9} | {:<8}",
        "#", "Book_Name", "Book_Price", "Rating", "Range", "Category"
    );
    println!("{}", "-".repeat(92));
    for row in table.head(n) {
        let price = row
            .price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".into());
        let range = row
            .price_range
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:>4} | {:<40} | {:>10} | {:>6} | {:<9} | {:<8}",
            row.index,
            truncate(&row.name, 40),
            price,
            row.rating,
            range,
            row.rating_category.to_string(),
        );
    }
}

pub fn print_info(table: &BookTable) {
    let rows = table.rows();
    let price_non_null = rows.iter().filter(|r| r.price.is_some()).count();
    let range_non_null = rows.iter().filter(|r| r.price_range.is_some()).count();

    println!("\nColumns ({} rows):", rows.len());
    let columns: [(&str, usize, &str); 5] = [
        ("Book_Name", rows.len(), "str"),
        ("Book_Price", price_non_null, "f64"),
        ("Book_Rating", rows.len(), "u8"),
        ("Price_Range", range_non_null, "category"),
        ("Rating_Category", rows.len(), "category"),
    ];
    for (name, non_null, dtype) in columns {
        println!("  {:<16} {:>6} non-null  {}", name, non_null, dtype);
    }
}

pub fn print_describe(table: &BookTable) {
    let prices: Vec<f64> = table.rows().iter().filter_map(|r| r.price).collect();
    let ratings: Vec<f64> = table.rows().iter().map(|r| f64::from(r.rating)).collect();

    let price_desc = describe(&prices);
    let rating_desc = describe(&ratings);

    println!("\nBasic statistics for numeric columns:");
    println!("  {:<6} {:>12} {:>12}", "", "Book_Price", "Book_Rating");

    let rows: [(&str, fn(&Describe) -> f64); 7] = [
        ("mean", |d| d.mean),
        ("std", |d| d.std),
        ("min", |d| d.min),
        ("25%", |d| d.q25),
        ("50%", |d| d.q50),
        ("75%", |d| d.q75),
        ("max", |d| d.max),
    ];

    println!(
        "  {:<6} {:>12} {:>12}",
        "count",
        price_desc.as_ref().map_or(0, |d| d.count),
        rating_desc.as_ref().map_or(0, |d| d.count)
    );
    for (label, field) in rows {
        println!(
            "  {:<6} {:>12} {:>12}",
            label,
            stat_cell(&price_desc, field),
            stat_cell(&rating_desc, field)
        );
    }
}

fn stat_cell(desc: &Option<Describe>, field: fn(&Describe) -> f64) -> String {
    match desc {
        Some(d) => format!("{:.2}", field(d)),
        None => "-".into(),
    }
}

pub fn print_value_counts(table: &BookTable) {
    println!("\nNumber of books in each price range:");
    for (bucket, count) in price_range_counts(table) {
        println!("  {:<10} {:>6}", bucket.to_string(), count);
    }

    println!("\nNumber of books in each rating category:");
    for (bucket, count) in rating_category_counts(table) {
        println!("  {:<10} {:>6}", bucket.to_string(), count);
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
