//! Catalog page.

use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement};

use vm_api_types::ItemId;
use vm_storefront::catalog::{CatalogController, CatalogView};
use vm_storefront::{CartAdd, FilterState, html};

use crate::api::{Client, FetchTransport};
use crate::dom::{self, get_el, get_typed};
use crate::events::{self, on_click_async};
use crate::notify;

const CATEGORY_PREFIX: &str = "cat";
const BRAND_PREFIX: &str = "brand";

struct Elements {
    products_grid: Element,
    products_count: Element,
    pagination: Element,
    sort_select: HtmlSelectElement,
    view_btns: Vec<Element>,
    category_filter: Element,
    brand_filter: Element,
    min_price: HtmlInputElement,
    max_price: HtmlInputElement,
    in_stock_only: HtmlInputElement,
    apply_filters: HtmlElement,
    reset_filters: HtmlElement,
    apply_price: HtmlElement,
}

impl Elements {
    fn bind() -> Result<Self, JsValue> {
        Ok(Self {
            products_grid: get_el!("productsGrid"),
            products_count: get_el!("productsCount"),
            pagination: get_el!("pagination"),
            sort_select: get_typed!(HtmlSelectElement, "sortSelect"),
            view_btns: dom::query_all(".view-btn"),
            category_filter: get_el!("categoryFilter"),
            brand_filter: get_el!("brandFilter"),
            min_price: get_typed!(HtmlInputElement, "minPrice"),
            max_price: get_typed!(HtmlInputElement, "maxPrice"),
            in_stock_only: get_typed!(HtmlInputElement, "inStockOnly"),
            apply_filters: get_typed!(HtmlElement, "applyFilters"),
            reset_filters: get_typed!(HtmlElement, "resetFilters"),
            apply_price: get_typed!(HtmlElement, "applyPrice"),
        })
    }
}

struct CatalogPage {
    ctrl: CatalogController<FetchTransport>,
    els: Elements,
}

type Page = Rc<CatalogPage>;

pub async fn start(client: Rc<Client>) -> Result<(), JsValue> {
    let page: Page = Rc::new(CatalogPage {
        ctrl: CatalogController::from_page_query(client, &crate::api::page_query()),
        els: Elements::bind()?,
    });

    let categories = page.ctrl.category_options().await;
    if !categories.is_empty() {
        dom::set_html(
            &page.els.category_filter,
            &html::filter_options(CATEGORY_PREFIX, &categories),
        );
    }
    dom::set_html(
        &page.els.brand_filter,
        &html::filter_options(BRAND_PREFIX, &page.ctrl.brand_options()),
    );
    page.els.sort_select.set_value(&page.ctrl.sort_value());

    bind_events(&page)?;
    refresh(&page, page.ctrl.load()).await;
    Ok(())
}

/// Show the loading state, await the fetch and render it unless a newer
/// fetch has taken over. Only pass fetches that will issue a request.
async fn refresh(page: &Page, fetch: impl Future<Output = Option<CatalogView>>) {
    dom::set_html(&page.els.products_grid, &html::loading("Loading products..."));
    if let Some(view) = fetch.await {
        render(page, &view);
    }
}

fn render(page: &Page, view: &CatalogView) {
    dom::set_html(&page.els.products_grid, &html::catalog_results(view));
    if let CatalogView::Results(results) = view {
        dom::set_text(&page.els.products_count, &results.count_label);
        dom::set_html(&page.els.pagination, &html::pagination(&results.pagination));
    }
}

fn checked_ids(container: &Element) -> Vec<u64> {
    dom::query_all_within(container, "input:checked")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .filter_map(|input| input.value().parse().ok())
        .collect()
}

async fn on_apply_filters(page: &Page) {
    let categories = checked_ids(&page.els.category_filter);
    let brands = checked_ids(&page.els.brand_filter);
    let in_stock = page.els.in_stock_only.checked();
    refresh(page, page.ctrl.apply_selection(categories, brands, in_stock)).await;
}

async fn on_reset(page: &Page) {
    for container in [&page.els.category_filter, &page.els.brand_filter] {
        for input in dom::query_all_within(container, "input") {
            if let Ok(input) = input.dyn_into::<HtmlInputElement>() {
                input.set_checked(false);
            }
        }
    }
    page.els.min_price.set_value("");
    page.els.max_price.set_value("");
    page.els.in_stock_only.set_checked(false);
    page.els
        .sort_select
        .set_value(&FilterState::default().sort.to_string());
    refresh(page, page.ctrl.reset()).await;
}

fn on_apply_price(page: &Page) {
    page.ctrl
        .apply_price(&page.els.min_price.value(), &page.els.max_price.value());
}

async fn on_grid_click(page: &Page, ev: Event) {
    if let Some(btn) = dom::closest(&ev, ".add-btn") {
        let Some(id) = dom::data_attr(&btn, "id").and_then(|id| id.parse::<ItemId>().ok()) else {
            return;
        };
        let outcome = page.ctrl.add_to_cart(id).await;
        if outcome == CartAdd::LoginRequired {
            tracing::debug!(%id, "add to cart needs a session");
        }
        notify::show(&outcome.notification());
    } else if let Some(btn) = dom::closest(&ev, ".compare-btn") {
        if let Some(id) = dom::data_attr(&btn, "id").and_then(|id| id.parse::<ItemId>().ok()) {
            notify::show(&page.ctrl.add_to_comparison(id).await);
        }
    }
}

async fn on_pagination_click(page: &Page, ev: Event) {
    let Some(target) = dom::closest(&ev, "[data-page]")
        .and_then(|btn| dom::data_attr(&btn, "page"))
        .and_then(|p| p.parse::<u32>().ok())
    else {
        return;
    };
    if page.ctrl.accepts_page(target) {
        refresh(page, page.ctrl.go_to_page(target)).await;
    }
}

fn select_view(page: &Page, btn: &Element) {
    for other in &page.els.view_btns {
        dom::remove_class(other, "active");
    }
    dom::add_class(btn, "active");
    let view = dom::data_attr(btn, "view").unwrap_or_else(|| "grid".into());
    page.els
        .products_grid
        .set_class_name(&format!("products-grid {view}-view"));
}

fn bind_events(page: &Page) -> Result<(), JsValue> {
    {
        let page2 = page.clone();
        events::on_async(&page.els.sort_select, "change", move |_| {
            let page = page2.clone();
            async move {
                let value = page.els.sort_select.value();
                if page.ctrl.accepts_sort(&value) {
                    refresh(&page, page.ctrl.change_sort(&value)).await;
                }
            }
        });
    }
    for btn in &page.els.view_btns {
        let page2 = page.clone();
        let btn2 = btn.clone();
        events::on(btn, "click", move |_: Event| select_view(&page2, &btn2));
    }

    on_click_async!(page.els.apply_filters, page, on_apply_filters);
    on_click_async!(page.els.reset_filters, page, on_reset);
    {
        let page2 = page.clone();
        events::on(&page.els.apply_price, "click", move |_: Event| on_apply_price(&page2));
    }

    // One delegated listener covers every sidebar checkbox.
    {
        let page2 = page.clone();
        events::on_async(&dom::document(), "change", move |ev| {
            let page = page2.clone();
            async move {
                let is_checkbox = ev
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some_and(|input| input.type_() == "checkbox");
                let in_sidebar = dom::closest(&ev, "#categoryFilter").is_some()
                    || dom::closest(&ev, "#brandFilter").is_some();
                if is_checkbox && in_sidebar {
                    on_apply_filters(&page).await;
                }
            }
        });
    }
    {
        let page2 = page.clone();
        events::on_async(&page.els.products_grid, "click", move |ev| {
            let page = page2.clone();
            async move { on_grid_click(&page, ev).await }
        });
    }
    {
        let page2 = page.clone();
        events::on_async(&page.els.pagination, "click", move |ev| {
            let page = page2.clone();
            async move { on_pagination_click(&page, ev).await }
        });
    }
    Ok(())
}
