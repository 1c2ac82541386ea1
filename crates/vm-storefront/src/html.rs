//! Markup for the page fragments. Every interpolated string is escaped; the
//! browser crate only assigns the results to `innerHTML`.

use std::fmt::Write;

use crate::cards::{CATALOG_PAGE, CategoryCard, FilterOption, ProductCard};
use crate::cart::CartView;
use crate::catalog::CatalogView;
use crate::compare::ComparisonTable;
use crate::format::escape_html as esc;
use crate::pagination::PageWindow;
use crate::product::{ReviewsView, SpecRow};
use crate::stars::StarRating;

pub fn loading(message: &str) -> String {
    format!(r#"<div class="loading">{}</div>"#, esc(message))
}

pub fn error(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, esc(message))
}

pub fn empty(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, esc(message))
}

pub fn stars(rating: &StarRating) -> String {
    rating
        .glyphs()
        .iter()
        .map(|star| format!(r#"<i class="{}"></i>"#, star.css_class()))
        .collect()
}

pub fn product_card(card: &ProductCard) -> String {
    let old_price = card
        .old_price_label
        .as_deref()
        .map(|label| format!(r#"<div class="old-price">{}</div>"#, esc(label)))
        .unwrap_or_default();
    format!(
        r#"<div class="product">
  <a href="{href}"><img src="{img}" alt="{name}"></a>
  <a href="{href}" class="title">{name}</a>
  <div class="meta">{brand}</div>
  <div class="price-row"><div class="price">{price}</div>{old_price}</div>
  <div class="product-actions">
    <button class="add-btn" data-id="{id}"><i class="fas fa-cart-plus"></i> Add</button>
    <button class="compare-btn" data-id="{id}" title="Add to comparison"><i class="fas fa-balance-scale"></i></button>
  </div>
</div>"#,
        href = esc(&card.href),
        img = esc(&card.image_url),
        name = esc(&card.name),
        brand = esc(&card.brand),
        price = esc(&card.price_label),
        id = card.id,
    )
}

/// Home page grid; the home page shows no empty state.
pub fn product_grid(cards: &[ProductCard]) -> String {
    cards.iter().map(product_card).collect()
}

pub fn catalog_results(view: &CatalogView) -> String {
    match view {
        CatalogView::Results(results) if results.cards.is_empty() => empty("No products found"),
        CatalogView::Results(results) => product_grid(&results.cards),
        CatalogView::Failed { message } => error(message),
    }
}

/// Smaller cards for the "related items" strip: no old price, no compare.
pub fn related_grid(cards: &[ProductCard]) -> String {
    if cards.is_empty() {
        return "<p>No similar items</p>".to_owned();
    }
    cards
        .iter()
        .map(|card| {
            format!(
                r#"<div class="product">
  <a href="{href}"><img src="{img}" alt="{name}"></a>
  <a href="{href}" class="title">{name}</a>
  <div class="meta">{brand}</div>
  <div class="price-row"><div class="price">{price}</div></div>
  <button class="add-btn" data-id="{id}"><i class="fas fa-cart-plus"></i> Add</button>
</div>"#,
                href = esc(&card.href),
                img = esc(&card.image_url),
                name = esc(&card.name),
                brand = esc(&card.brand),
                price = esc(&card.price_label),
                id = card.id,
            )
        })
        .collect()
}

pub fn category_tiles(cards: &[CategoryCard]) -> String {
    cards
        .iter()
        .map(|card| {
            format!(
                r#"<a href="{}" class="category-card"><div class="category-icon"><i class="fas fa-mobile-alt"></i></div><h4>{}</h4><p>{}</p></a>"#,
                esc(&card.href),
                esc(&card.name),
                esc(&card.count_label),
            )
        })
        .collect()
}

/// Sidebar checkboxes; `prefix` keeps element ids unique per group.
pub fn filter_options(prefix: &str, options: &[FilterOption]) -> String {
    options
        .iter()
        .map(|option| {
            format!(
                r#"<div class="filter-item"><input type="checkbox" id="{prefix}_{id}" value="{id}"{checked}><label for="{prefix}_{id}">{label}</label></div>"#,
                prefix = esc(prefix),
                id = option.id,
                checked = if option.checked { " checked" } else { "" },
                label = esc(&option.label),
            )
        })
        .collect()
}

/// Page buttons carry `data-page`; disabled controls carry none.
pub fn pagination(window: &PageWindow) -> String {
    let mut out = String::new();
    page_button(&mut out, window.prev(), r#"<i class="fas fa-chevron-left"></i>"#, "");
    for page in &window.pages {
        let class = if window.is_current(*page) { " active" } else { "" };
        page_button(&mut out, Some(*page), &page.to_string(), class);
    }
    page_button(&mut out, window.next(), r#"<i class="fas fa-chevron-right"></i>"#, "");
    out
}

fn page_button(out: &mut String, target: Option<u32>, label: &str, class: &str) {
    let _ = match target {
        Some(page) => write!(out, r#"<button class="page-btn{class}" data-page="{page}">{label}</button>"#),
        None => write!(out, r#"<button class="page-btn{class}" disabled>{label}</button>"#),
    };
}

pub fn cart_lines(view: &CartView) -> String {
    if view.is_empty() {
        return empty("Cart is empty");
    }
    view.lines
        .iter()
        .map(|line| {
            format!(
                r#"<div class="cart-item">
  <img src="{img}" alt="{title}">
  <div style="flex:1">
    <div class="meta">{title}</div>
    <div class="cart-item-controls">
      <button data-op="dec" data-id="{id}" class="qty-btn">−</button>
      <div class="qty-display">{qty}</div>
      <button data-op="inc" data-id="{id}" class="qty-btn">＋</button>
      <button data-op="remove" data-id="{id}" class="remove-btn" title="Remove"><i class="fas fa-trash"></i></button>
    </div>
  </div>
  <div class="cart-item-price">{total}</div>
</div>"#,
                img = esc(&line.image_url),
                title = esc(&line.title),
                id = line.id,
                qty = line.quantity,
                total = esc(&line.line_total_label),
            )
        })
        .collect()
}

pub fn spec_list(rows: &[SpecRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                r#"<div class="spec-item"><span class="spec-name">{}</span><span class="spec-value">{}</span></div>"#,
                esc(&row.name),
                esc(&row.value),
            )
        })
        .collect()
}

pub fn description(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("<p>{}</p>", esc(line.trim())))
        .collect()
}

pub fn review_list(view: &ReviewsView) -> String {
    if view.is_empty() {
        return r#"<div class="empty-reviews"><p>No reviews yet. Be the first!</p></div>"#.to_owned();
    }
    view.cards
        .iter()
        .map(|card| {
            format!(
                r#"<div class="review-item">
  <div class="review-header"><div class="review-author">{}</div><div class="review-date">{}</div></div>
  <div class="review-rating">{}</div>
  <div class="review-text">{}</div>
</div>"#,
                esc(&card.author),
                esc(&card.date),
                stars(&card.stars),
                esc(&card.text),
            )
        })
        .collect()
}

pub fn not_found_page() -> String {
    format!(
        r#"<div class="container" style="text-align: center; padding: 100px 20px;">
  <h2>Product not found</h2>
  <p>The requested product does not exist or has been removed.</p>
  <a href="{CATALOG_PAGE}" class="primary-btn">Back to catalog</a>
</div>"#
    )
}

pub fn comparison_table(table: &ComparisonTable) -> String {
    let mut out = format!(
        r#"<h3>{}</h3><table class="comparison-table"><thead><tr><th></th>"#,
        esc(&table.title)
    );
    for column in &table.columns {
        let _ = write!(
            out,
            r#"<th><a href="{}">{}</a><div class="price">{}</div></th>"#,
            esc(&column.href),
            esc(&column.name),
            esc(&column.price_label),
        );
    }
    out.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        let _ = write!(out, "<tr><th>{}</th>", esc(&row.characteristic));
        for cell in &row.cells {
            let _ = write!(out, "<td>{}</td>", esc(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}
