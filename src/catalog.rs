pub const DEFAULT_BASE_URL: &str = "https://books.toscrape.com";

/// Sidebar categories in the site's own order. The site numbers category
/// pages from 2, so the category at position p lives at `<slug>_{p+2}`;
/// any renumbering on the remote side breaks every URL after it.
pub const CATEGORY_NAMES: [&str; 50] = [
    "Travel",
    "Mystery",
    "Historical Fiction",
    "Sequential Art",
    "Classics",
    "Philosophy",
    "Romance",
    "Womens Fiction",
    "Fiction",
    "Childrens",
    "Religion",
    "Nonfiction",
    "Music",
    "Default",
    "Science Fiction",
    "Sports and Games",
    "Add a comment",
    "Fantasy",
    "New Adult",
    "Young Adult",
    "Science",
    "Poetry",
    "Paranormal",
    "Art",
    "Psychology",
    "Autobiography",
    "Parenting",
    "Adult Fiction",
    "Humor",
    "Horror",
    "History",
    "Food and Drink",
    "Christian Fiction",
    "Business",
    "Biography",
    "Thriller",
    "Contemporary",
    "Spirituality",
    "Academic",
    "Self Help",
    "Historical",
    "Christian",
    "Suspense",
    "Short Stories",
    "Novels",
    "Health",
    "Politics",
    "Cultural",
    "Erotica",
    "Crime",
];

#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub offset: usize,
}

impl Category {
    /// First listing page of this category. Pagination beyond it is never
    /// followed.
    pub fn index_url(&self, base_url: &str) -> String {
        format!(
            "{}/catalogue/category/books/{}_{}/index.html",
            base_url.trim_end_matches('/'),
            self.slug,
            self.offset
        )
    }
}

/// Lowercase with spaces replaced by hyphens, matching the site's URL slugs.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

pub fn all_categories() -> Vec<Category> {
    CATEGORY_NAMES
        .iter()
        .enumerate()
        .map(|(p, name)| Category {
            name: (*name).to_string(),
            slug: slugify(name),
            offset: p + 2,
        })
        .collect()
}

// ── Tests ──
