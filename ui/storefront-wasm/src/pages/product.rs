//! Product detail page.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlImageElement, HtmlInputElement, HtmlTextAreaElement};

use vm_api_types::ItemId;
use vm_storefront::cards::CATALOG_PAGE;
use vm_storefront::product::{ProductController, ProductPage, ProductView, QuantityStepper, ReviewSubmission, ReviewsView};
use vm_storefront::{format, html};

use crate::api::{self, Client, FetchTransport};
use crate::dom::{self, get_el, get_typed};
use crate::events::{self, on_click_async, on_submit_async};
use crate::notify;

const ACTIVE: &str = "active";

struct Elements {
    product_title: Element,
    product_breadcrumb: Element,
    category_breadcrumb: Element,
    product_sku: Element,
    current_price: Element,
    old_price: Element,
    discount_badge: Element,
    availability_icon: Element,
    availability_text: Element,
    stock_count: Element,
    main_image: HtmlImageElement,
    thumbnails: Element,
    product_description: Element,
    specifications_list: Element,
    review_count: Element,
    reviews_count: Element,
    average_rating: Element,
    average_stars: Element,
    total_reviews: Element,
    reviews_list: Element,
    related_products: Element,
    quantity: HtmlInputElement,
    decrease_qty: HtmlElement,
    increase_qty: HtmlElement,
    add_to_cart_btn: HtmlButtonElement,
    add_to_comparison: HtmlElement,
    write_review_btn: HtmlElement,
    review_form_container: Element,
    cancel_review: HtmlElement,
    review_form: HtmlFormElement,
    review_rating: HtmlInputElement,
    review_text: HtmlTextAreaElement,
    tab_btns: Vec<Element>,
    tab_panes: Vec<Element>,
    star_inputs: Vec<Element>,
    stars_input: Option<Element>,
}

impl Elements {
    fn bind() -> Result<Self, JsValue> {
        Ok(Self {
            product_title: get_el!("productTitle"),
            product_breadcrumb: get_el!("productBreadcrumb"),
            category_breadcrumb: get_el!("categoryBreadcrumb"),
            product_sku: get_el!("productSKU"),
            current_price: get_el!("currentPrice"),
            old_price: get_el!("oldPrice"),
            discount_badge: get_el!("discountBadge"),
            availability_icon: get_el!("availabilityIcon"),
            availability_text: get_el!("availabilityText"),
            stock_count: get_el!("stockCount"),
            main_image: get_typed!(HtmlImageElement, "mainImage"),
            thumbnails: get_el!("thumbnails"),
            product_description: get_el!("productDescription"),
            specifications_list: get_el!("specificationsList"),
            review_count: get_el!("reviewCount"),
            reviews_count: get_el!("reviewsCount"),
            average_rating: get_el!("averageRating"),
            average_stars: get_el!("averageStars"),
            total_reviews: get_el!("totalReviews"),
            reviews_list: get_el!("reviewsList"),
            related_products: get_el!("relatedProducts"),
            quantity: get_typed!(HtmlInputElement, "quantity"),
            decrease_qty: get_typed!(HtmlElement, "decreaseQty"),
            increase_qty: get_typed!(HtmlElement, "increaseQty"),
            add_to_cart_btn: get_typed!(HtmlButtonElement, "addToCartBtn"),
            add_to_comparison: get_typed!(HtmlElement, "addToComparison"),
            write_review_btn: get_typed!(HtmlElement, "writeReviewBtn"),
            review_form_container: get_el!("reviewFormContainer"),
            cancel_review: get_typed!(HtmlElement, "cancelReview"),
            review_form: get_typed!(HtmlFormElement, "reviewForm"),
            review_rating: get_typed!(HtmlInputElement, "reviewRating"),
            review_text: get_typed!(HtmlTextAreaElement, "reviewText"),
            tab_btns: dom::query_all(".tab-btn"),
            tab_panes: dom::query_all(".tab-pane"),
            star_inputs: dom::query_all(".stars-input i"),
            stars_input: dom::query(".stars-input"),
        })
    }
}

struct ProductPageUi {
    ctrl: ProductController<FetchTransport>,
    els: Elements,
}

type Page = Rc<ProductPageUi>;

pub async fn start(client: Rc<Client>) -> Result<(), JsValue> {
    let Some(ctrl) = ProductController::from_page_query(client, &api::page_query()) else {
        api::navigate(CATALOG_PAGE);
        return Ok(());
    };
    let els = Elements::bind()?;

    let view = match ctrl.load().await {
        ProductPage::Found(view) => view,
        ProductPage::NotFound => {
            if let Some(body) = dom::document().body() {
                body.set_inner_html(&html::not_found_page());
            }
            return Ok(());
        }
    };
    let page: Page = Rc::new(ProductPageUi { ctrl, els });
    render_product(&page, &view);

    if let Some(reviews) = page.ctrl.load_reviews().await {
        render_reviews(&page, &reviews);
    }
    let related = page.ctrl.related().await.unwrap_or_default();
    dom::set_html(&page.els.related_products, &html::related_grid(&related));

    bind_events(&page)
}

fn render_product(page: &Page, view: &ProductView) {
    let els = &page.els;
    dom::document().set_title(&view.document_title);
    dom::set_text(&els.product_title, &view.title);
    dom::set_text(&els.product_breadcrumb, &view.title);
    dom::set_text(&els.product_sku, &view.sku);

    dom::set_text(&els.current_price, &view.price.current);
    if let (Some(old), Some(badge)) = (&view.price.old, &view.price.discount_badge) {
        dom::set_text(&els.old_price, old);
        dom::show(&els.old_price, "block");
        dom::set_text(&els.discount_badge, badge);
        dom::show(&els.discount_badge, "block");
    }

    if view.availability.in_stock {
        els.availability_icon.set_class_name("fas fa-check-circle in-stock");
        els.add_to_cart_btn.set_disabled(false);
    } else {
        els.availability_icon.set_class_name("fas fa-times-circle out-of-stock");
        els.add_to_cart_btn.set_disabled(true);
        els.add_to_cart_btn.set_text_content(Some(&view.availability.label));
    }
    dom::set_text(&els.availability_text, &view.availability.label);
    dom::set_text(&els.stock_count, "");

    if let Some(url) = &view.image_url {
        els.main_image.set_src(url);
        els.main_image.set_alt(&view.title);
        dom::set_html(
            &els.thumbnails,
            &format!(
                r#"<div class="thumbnail active"><img src="{}" alt="{}"></div>"#,
                format::escape_html(url),
                format::escape_html(&view.title),
            ),
        );
    }

    dom::set_html(&els.product_description, &html::description(&view.description));
    if !view.specifications.is_empty() {
        dom::set_html(&els.specifications_list, &html::spec_list(&view.specifications));
    }
    if let Some(category) = &view.category {
        dom::set_text(&els.category_breadcrumb, &category.name);
        let _ = els.category_breadcrumb.set_attribute("href", &category.href);
    }
    if let Some(rating) = &view.rating {
        let count = rating.review_count.to_string();
        dom::set_text(&els.review_count, &rating.label);
        dom::set_text(&els.reviews_count, &count);
        dom::set_text(&els.total_reviews, &count);
        dom::set_text(&els.average_rating, &rating.value);
        dom::set_html(&els.average_stars, &html::stars(&rating.stars));
    }
}

fn render_reviews(page: &Page, reviews: &ReviewsView) {
    dom::set_html(&page.els.reviews_list, &html::review_list(reviews));
}

fn stepper(page: &Page) -> QuantityStepper {
    QuantityStepper::from_input(&page.els.quantity.value())
}

fn set_stepper(page: &Page, qty: QuantityStepper) {
    page.els.quantity.set_value(&qty.value().to_string());
}

fn highlight_stars(page: &Page, rating: u8) {
    for (index, star) in page.els.star_inputs.iter().enumerate() {
        if index < usize::from(rating) {
            star.set_class_name("fas fa-star");
        } else {
            star.set_class_name("far fa-star");
        }
    }
}

fn current_rating(page: &Page) -> u8 {
    page.els.review_rating.value().trim().parse().unwrap_or(0)
}

fn close_review_form(page: &Page) {
    dom::hide(&page.els.review_form_container);
    dom::show(&page.els.write_review_btn, "block");
}

fn select_tab(page: &Page, btn: &Element) {
    let Some(tab) = dom::data_attr(btn, "tab") else { return };
    for other in &page.els.tab_btns {
        dom::remove_class(other, ACTIVE);
    }
    dom::add_class(btn, ACTIVE);
    for pane in &page.els.tab_panes {
        dom::remove_class(pane, ACTIVE);
    }
    if let Some(pane) = dom::by_id(&format!("{tab}Tab")) {
        dom::add_class(&pane, ACTIVE);
    }
}

async fn on_add_to_cart(page: &Page) {
    notify::show(&page.ctrl.add_to_cart(stepper(page)).await);
}

async fn on_add_to_comparison(page: &Page) {
    notify::show(&page.ctrl.add_to_comparison().await);
}

async fn on_submit_review(page: &Page) {
    let outcome = page
        .ctrl
        .submit_review(current_rating(page), &page.els.review_text.value())
        .await;
    if let ReviewSubmission::Submitted { reviews, .. } = &outcome {
        page.els.review_form.reset();
        page.els.review_rating.set_value("0");
        highlight_stars(page, 0);
        close_review_form(page);
        if let Some(reviews) = reviews {
            render_reviews(page, reviews);
        }
    }
    notify::show(outcome.notification());
}

async fn on_related_click(page: &Page, ev: Event) {
    let Some(id) = dom::closest(&ev, ".add-btn")
        .and_then(|btn| dom::data_attr(&btn, "id"))
        .and_then(|id| id.parse::<ItemId>().ok())
    else {
        return;
    };
    notify::show(&page.ctrl.add_related_to_cart(id).await);
}

fn bind_events(page: &Page) -> Result<(), JsValue> {
    {
        let page2 = page.clone();
        events::on(&page.els.decrease_qty, "click", move |_: Event| {
            set_stepper(&page2, stepper(&page2).decrement());
        });
    }
    {
        let page2 = page.clone();
        events::on(&page.els.increase_qty, "click", move |_: Event| {
            set_stepper(&page2, stepper(&page2).increment());
        });
    }
    {
        let page2 = page.clone();
        events::on(&page.els.quantity, "change", move |_: Event| {
            set_stepper(&page2, stepper(&page2));
        });
    }
    on_click_async!(page.els.add_to_cart_btn, page, on_add_to_cart);
    on_click_async!(page.els.add_to_comparison, page, on_add_to_comparison);

    for btn in &page.els.tab_btns {
        let page2 = page.clone();
        let btn2 = btn.clone();
        events::on(btn, "click", move |_: Event| select_tab(&page2, &btn2));
    }

    {
        let page2 = page.clone();
        events::on(&page.els.write_review_btn, "click", move |_: Event| {
            if let Some(warning) = page2.ctrl.open_review_form() {
                notify::show(&warning);
                return;
            }
            dom::show(&page2.els.review_form_container, "block");
            dom::hide(&page2.els.write_review_btn);
        });
    }
    {
        let page2 = page.clone();
        events::on(&page.els.cancel_review, "click", move |_: Event| close_review_form(&page2));
    }

    for star in &page.els.star_inputs {
        let rating: u8 = dom::data_attr(star, "rating")
            .and_then(|r| r.parse().ok())
            .unwrap_or(0);
        let page2 = page.clone();
        events::on(star, "mouseover", move |_: Event| highlight_stars(&page2, rating));
        let page2 = page.clone();
        events::on(star, "click", move |_: Event| {
            page2.els.review_rating.set_value(&rating.to_string());
            highlight_stars(&page2, rating);
        });
    }
    if let Some(stars) = &page.els.stars_input {
        let page2 = page.clone();
        events::on(stars, "mouseleave", move |_: Event| {
            highlight_stars(&page2, current_rating(&page2));
        });
    }

    on_submit_async!(page.els.review_form, page, on_submit_review);
    {
        let page2 = page.clone();
        events::on_async(&page.els.related_products, "click", move |ev| {
            let page = page2.clone();
            async move { on_related_click(&page, ev).await }
        });
    }
    Ok(())
}
