//! Plain-text renderings of the storefront view models.

use std::fmt::Write;

use vm_storefront::catalog::CatalogView;
use vm_storefront::{CartView, CategoryCard, ComparisonTable, PageWindow, ProductCard, ProductView, ReviewsView};

pub fn product_line(card: &ProductCard) -> String {
    let mut line = format!("#{:<6} {}  {}", card.id, card.name, card.price_label);
    if let Some(old) = &card.old_price_label {
        let _ = write!(line, " (was {old})");
    }
    if !card.brand.is_empty() {
        let _ = write!(line, "  [{}]", card.brand);
    }
    line
}

pub fn product_list(cards: &[ProductCard], empty: &str) -> String {
    if cards.is_empty() {
        return format!("{empty}\n");
    }
    cards.iter().map(|card| product_line(card) + "\n").collect()
}

pub fn page_window(window: &PageWindow) -> String {
    if window.pages.is_empty() {
        return String::new();
    }
    let pages: Vec<String> = window
        .pages
        .iter()
        .map(|page| {
            if window.is_current(*page) {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();
    format!(
        "{} {} {}  of {}\n",
        if window.prev_disabled { " " } else { "<" },
        pages.join(" "),
        if window.next_disabled { " " } else { ">" },
        window.total_pages,
    )
}

pub fn catalog(view: &CatalogView) -> String {
    match view {
        CatalogView::Results(results) => {
            let mut out = format!("{}\n", results.count_label);
            out.push_str(&product_list(&results.cards, "No products found"));
            out.push_str(&page_window(&results.pagination));
            out
        }
        CatalogView::Failed { message } => format!("{message}\n"),
    }
}

pub fn categories(cards: &[CategoryCard]) -> String {
    cards
        .iter()
        .map(|card| format!("#{:<4} {} ({})\n", card.id, card.name, card.count_label))
        .collect()
}

pub fn product(view: &ProductView) -> String {
    let mut out = format!("{}\nSKU: {}\n", view.title, view.sku);
    let _ = write!(out, "Price: {}", view.price.current);
    if let (Some(old), Some(badge)) = (&view.price.old, &view.price.discount_badge) {
        let _ = write!(out, "  (was {old}, {badge})");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", view.availability.label);
    if let Some(category) = &view.category {
        let _ = writeln!(out, "Category: {}", category.name);
    }
    if let Some(rating) = &view.rating {
        let _ = writeln!(out, "Rating: {} {}", rating.stars.to_symbols(), rating.label);
    }
    if !view.specifications.is_empty() {
        out.push_str("Specifications:\n");
        for row in &view.specifications {
            let _ = writeln!(out, "  {}: {}", row.name, row.value);
        }
    }
    let _ = writeln!(out, "\n{}", view.description.trim());
    out
}

pub fn reviews(view: &ReviewsView) -> String {
    if view.is_empty() {
        return "No reviews yet. Be the first!\n".to_owned();
    }
    let mut out = format!("{} reviews\n", view.total);
    for card in &view.cards {
        let _ = writeln!(out, "{} {} on {}\n  {}", card.stars.to_symbols(), card.author, card.date, card.text);
    }
    out
}

pub fn cart(view: &CartView) -> String {
    if view.is_empty() {
        return "Cart is empty\n".to_owned();
    }
    let mut out = String::new();
    for line in &view.lines {
        let _ = writeln!(out, "#{:<6} {} x{}  {}", line.id, line.title, line.quantity, line.line_total_label);
    }
    let _ = writeln!(out, "{} items, total {}", view.badge_count, view.total_label);
    out
}

pub fn comparison(table: &ComparisonTable) -> String {
    let mut out = format!("{}\n", table.title);
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    let _ = writeln!(out, "  {}", names.join(" | "));
    let prices: Vec<&str> = table.columns.iter().map(|c| c.price_label.as_str()).collect();
    let _ = writeln!(out, "  Price: {}", prices.join(" | "));
    for row in &table.rows {
        let _ = writeln!(out, "  {}: {}", row.characteristic, row.cells.join(" | "));
    }
    out
}
