//! Storefront home page.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent};

use vm_api_types::ItemId;
use vm_storefront::home::{AuthPanel, Checkout, HomeController, search_url};
use vm_storefront::{CartAdd, html};

use crate::api::{self, Client, FetchTransport};
use crate::dom::{self, get_el, get_typed};
use crate::events::{self, on_click_async, on_submit_async};
use crate::notify;

const OPEN: &str = "open";

struct Elements {
    product_grid: Element,
    category_grid: Element,
    cart_btn: HtmlElement,
    cart_panel: Element,
    close_cart: HtmlElement,
    cart_items: Element,
    cart_count: Element,
    cart_total: Element,
    checkout_btn: HtmlElement,
    clear_cart_btn: HtmlElement,
    auth_btn: Element,
    auth_modal: Element,
    close_auth: HtmlElement,
    auth_tabs: Vec<Element>,
    login_form: Element,
    login_email: HtmlInputElement,
    login_password: HtmlInputElement,
    register_form: Element,
    register_name: HtmlInputElement,
    register_email: HtmlInputElement,
    register_password: HtmlInputElement,
    register_phone: HtmlInputElement,
    logout_btn: Option<Element>,
    user_panel: Element,
    user_name: Element,
    search_input: HtmlInputElement,
    search_btn: HtmlElement,
}

impl Elements {
    fn bind() -> Result<Self, JsValue> {
        Ok(Self {
            product_grid: get_el!("productGrid"),
            category_grid: get_el!("categoryGrid"),
            cart_btn: get_typed!(HtmlElement, "cartBtn"),
            cart_panel: get_el!("cartPanel"),
            close_cart: get_typed!(HtmlElement, "closeCart"),
            cart_items: get_el!("cartItems"),
            cart_count: get_el!("cartCount"),
            cart_total: get_el!("cartTotal"),
            checkout_btn: get_typed!(HtmlElement, "checkoutBtn"),
            clear_cart_btn: get_typed!(HtmlElement, "clearCartBtn"),
            auth_btn: get_el!("authBtn"),
            auth_modal: get_el!("authModal"),
            close_auth: get_typed!(HtmlElement, "closeAuth"),
            auth_tabs: dom::query_all(".auth-tab"),
            login_form: get_el!("loginForm"),
            login_email: get_typed!(HtmlInputElement, "loginEmail"),
            login_password: get_typed!(HtmlInputElement, "loginPassword"),
            register_form: get_el!("registerForm"),
            register_name: get_typed!(HtmlInputElement, "registerName"),
            register_email: get_typed!(HtmlInputElement, "registerEmail"),
            register_password: get_typed!(HtmlInputElement, "registerPassword"),
            register_phone: get_typed!(HtmlInputElement, "registerPhone"),
            logout_btn: dom::by_id("logoutBtn"),
            user_panel: get_el!("userPanel"),
            user_name: get_el!("userName"),
            search_input: get_typed!(HtmlInputElement, "searchInput"),
            search_btn: get_typed!(HtmlElement, "searchBtn"),
        })
    }
}

struct HomePage {
    ctrl: HomeController<FetchTransport>,
    els: Elements,
}

type Page = Rc<HomePage>;

pub async fn start(client: Rc<Client>) -> Result<(), JsValue> {
    let page: Page = Rc::new(HomePage {
        ctrl: HomeController::new(client),
        els: Elements::bind()?,
    });

    let panel = page.ctrl.check_auth().await;
    render_panel(&page, &panel);
    render_cart(&page);

    match page.ctrl.top_rated().await {
        Some(cards) => dom::set_html(&page.els.product_grid, &html::product_grid(&cards)),
        None => dom::set_html(
            &page.els.product_grid,
            &html::error(vm_storefront::catalog::LOAD_ERROR),
        ),
    }
    let categories = page.ctrl.categories().await;
    if !categories.is_empty() {
        dom::set_html(&page.els.category_grid, &html::category_tiles(&categories));
    }

    bind_events(&page)
}

fn render_panel(page: &Page, panel: &AuthPanel) {
    match panel {
        AuthPanel::SignedIn { display_name } => {
            dom::hide(&page.els.auth_btn);
            dom::show(&page.els.user_panel, "flex");
            dom::set_text(&page.els.user_name, display_name);
        }
        AuthPanel::SignedOut => {
            dom::show(&page.els.auth_btn, "block");
            dom::hide(&page.els.user_panel);
        }
    }
}

fn render_cart(page: &Page) {
    let view = page.ctrl.cart_view();
    dom::set_text(&page.els.cart_count, &view.badge_count.to_string());
    dom::set_html(&page.els.cart_items, &html::cart_lines(&view));
    dom::set_text(&page.els.cart_total, &view.total_label);
}

fn open_auth(page: &Page) {
    dom::add_class(&page.els.auth_modal, OPEN);
}

fn close_overlays(page: &Page) {
    dom::remove_class(&page.els.cart_panel, OPEN);
    dom::remove_class(&page.els.auth_modal, OPEN);
}

fn item_id(el: &Element) -> Option<ItemId> {
    dom::data_attr(el, "id")?.parse().ok()
}

async fn on_page_click(page: &Page, ev: Event) {
    if let Some(btn) = dom::closest(&ev, ".add-btn") {
        let Some(id) = item_id(&btn) else { return };
        let outcome = page.ctrl.add_to_cart(id).await;
        if outcome == CartAdd::LoginRequired {
            open_auth(page);
        }
        render_cart(page);
        notify::show(&outcome.notification());
        return;
    }
    if let Some(btn) = dom::closest(&ev, ".compare-btn") {
        if let Some(id) = item_id(&btn) {
            notify::show(&page.ctrl.add_to_comparison(id).await);
        }
        return;
    }
    if let Some(btn) = dom::closest(&ev, "[data-op]") {
        let Some(id) = item_id(&btn) else { return };
        let note = match dom::data_attr(&btn, "op").as_deref() {
            Some("inc") => page.ctrl.change_quantity(id, 1).await.notification().cloned(),
            Some("dec") => page.ctrl.change_quantity(id, -1).await.notification().cloned(),
            Some("remove") => Some(page.ctrl.remove(id).await),
            _ => None,
        };
        render_cart(page);
        notify::show_opt(note);
    }
}

async fn on_checkout(page: &Page) {
    match page.ctrl.checkout() {
        Checkout::Proceed(target) => api::navigate(target),
        Checkout::Blocked(note) => notify::show(&note),
        Checkout::LoginRequired(note) => {
            notify::show(&note);
            open_auth(page);
        }
    }
}

async fn on_clear(page: &Page) {
    let note = page
        .ctrl
        .clear(|| {
            dom::window()
                .confirm_with_message("Are you sure you want to clear the cart?")
                .unwrap_or(false)
        })
        .await;
    render_cart(page);
    notify::show_opt(note);
}

async fn on_login(page: &Page) {
    let note = page
        .ctrl
        .login(
            &dom::input_value(&page.els.login_email),
            &page.els.login_password.value(),
        )
        .await;
    after_auth(page, &note);
}

async fn on_register(page: &Page) {
    let note = page
        .ctrl
        .register(
            &dom::input_value(&page.els.register_name),
            &dom::input_value(&page.els.register_email),
            &page.els.register_password.value(),
            &dom::input_value(&page.els.register_phone),
        )
        .await;
    after_auth(page, &note);
}

fn after_auth(page: &Page, note: &vm_storefront::Notification) {
    if note.severity == vm_storefront::Severity::Success {
        dom::remove_class(&page.els.auth_modal, OPEN);
    }
    render_panel(page, &page.ctrl.panel());
    render_cart(page);
    notify::show(note);
}

async fn on_logout(page: &Page) {
    let note = page.ctrl.logout().await;
    render_panel(page, &page.ctrl.panel());
    render_cart(page);
    notify::show_opt(note);
}

fn on_search(page: &Page) {
    if let Some(url) = search_url(&page.els.search_input.value()) {
        api::navigate(&url);
    }
}

fn select_auth_tab(page: &Page, tab_name: &str) {
    for tab in &page.els.auth_tabs {
        dom::toggle_class(tab, "active", dom::data_attr(tab, "tab").as_deref() == Some(tab_name));
    }
    for form in dom::query_all(".auth-form") {
        dom::toggle_class(&form, "active", form.id() == format!("{tab_name}Form"));
    }
}

fn bind_events(page: &Page) -> Result<(), JsValue> {
    let body = dom::document().body().ok_or_else(|| dom::missing("body"))?;
    {
        let page = page.clone();
        events::on_async(&body, "click", move |ev| {
            let page = page.clone();
            async move { on_page_click(&page, ev).await }
        });
    }

    {
        let page2 = page.clone();
        events::on(&page.els.cart_btn, "click", move |_: Event| {
            let _ = page2.els.cart_panel.class_list().toggle(OPEN);
        });
    }
    {
        let page2 = page.clone();
        events::on(&page.els.close_cart, "click", move |_: Event| {
            dom::remove_class(&page2.els.cart_panel, OPEN);
        });
    }
    on_click_async!(page.els.checkout_btn, page, on_checkout);
    on_click_async!(page.els.clear_cart_btn, page, on_clear);

    {
        let page2 = page.clone();
        events::on(&page.els.auth_btn, "click", move |_: Event| open_auth(&page2));
    }
    {
        let page2 = page.clone();
        events::on(&page.els.close_auth, "click", move |_: Event| {
            dom::remove_class(&page2.els.auth_modal, OPEN);
        });
    }
    for tab in &page.els.auth_tabs {
        let page2 = page.clone();
        let tab_name = dom::data_attr(tab, "tab").unwrap_or_default();
        events::on(tab, "click", move |_: Event| select_auth_tab(&page2, &tab_name));
    }
    on_submit_async!(page.els.login_form, page, on_login);
    on_submit_async!(page.els.register_form, page, on_register);
    if let Some(logout) = &page.els.logout_btn {
        on_click_async!(logout, page, on_logout);
    }

    {
        let page2 = page.clone();
        events::on(&page.els.search_btn, "click", move |_: Event| on_search(&page2));
    }
    {
        let page2 = page.clone();
        events::on(&page.els.search_input, "keypress", move |ev: KeyboardEvent| {
            if ev.key() == "Enter" {
                on_search(&page2);
            }
        });
    }

    let doc = dom::document();
    {
        let page2 = page.clone();
        events::on(&doc, "click", move |ev: Event| {
            if dom::closest(&ev, ".cart-panel").is_none() && dom::closest(&ev, "#cartBtn").is_none() {
                dom::remove_class(&page2.els.cart_panel, OPEN);
            }
            if dom::closest(&ev, ".auth-modal").is_none() && dom::closest(&ev, "#authBtn").is_none() {
                dom::remove_class(&page2.els.auth_modal, OPEN);
            }
        });
    }
    {
        let page2 = page.clone();
        events::on(&doc, "keydown", move |ev: KeyboardEvent| {
            if ev.key() == "Escape" {
                close_overlays(&page2);
            }
        });
    }
    Ok(())
}
