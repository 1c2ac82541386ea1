//! Runs one CLI command against the backend through the storefront
//! controllers and writes the result as text.

use std::io::Write;
use std::rc::Rc;

use anyhow::{Context, anyhow, bail};
use vm_api_types::ItemId;
use vm_client::{ApiClient, Transport};
use vm_storefront::catalog::CatalogController;
use vm_storefront::{
    AuthPanel, ComparisonTable, FilterState, HomeController, Notification, ProductController, ProductPage,
    QuantityChange, Severity, SortOption, cart, compare,
};

use crate::cli::Command;
use crate::render;

/// Success and info notes are printed; warnings and errors become the
/// command's error.
fn report<W: Write>(out: &mut W, note: &Notification) -> anyhow::Result<()> {
    match note.severity {
        Severity::Success | Severity::Info => {
            writeln!(out, "{}", note.message)?;
            Ok(())
        }
        Severity::Warning | Severity::Error => Err(anyhow!("{note}")),
    }
}

fn require_session<T: Transport>(client: &ApiClient<T>) -> anyhow::Result<()> {
    if !client.is_authenticated() {
        bail!("Not signed in. Run `voltmarket login` first");
    }
    Ok(())
}

pub async fn run<T: Transport, W: Write>(command: Command, client: Rc<ApiClient<T>>, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::Catalog {
            search,
            category,
            brand,
            min_price,
            max_price,
            in_stock,
            sort,
            page,
        } => {
            let mut filters = FilterState {
                page: page.max(1),
                category_ids: category,
                brand_ids: brand,
                in_stock,
                search: search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()),
                ..FilterState::default()
            };
            if let Some(sort) = sort {
                filters.sort = sort.parse::<SortOption>().map_err(|e| anyhow!(e))?;
            }
            filters.set_price(min_price.as_deref().unwrap_or_default(), max_price.as_deref().unwrap_or_default());
            let view = CatalogController::with_filters(client, filters)
                .load()
                .await
                .context("catalog request was superseded")?;
            write!(out, "{}", render::catalog(&view))?;
        }
        Command::Home => {
            let home = HomeController::new(client);
            match home.top_rated().await {
                Some(cards) => write!(out, "Top rated\n{}", render::product_list(&cards, "Nothing here yet"))?,
                None => writeln!(out, "{}", vm_storefront::catalog::LOAD_ERROR)?,
            }
            write!(out, "Categories\n{}", render::categories(&home.categories().await))?;
        }
        Command::Item { id } => match ProductController::new(client, ItemId(id)).load().await {
            ProductPage::Found(view) => write!(out, "{}", render::product(&view))?,
            ProductPage::NotFound => bail!("Product #{id} not found"),
        },
        Command::Reviews { id } => {
            let reviews = ProductController::new(client, ItemId(id))
                .load_reviews()
                .await
                .context("Could not load reviews")?;
            write!(out, "{}", render::reviews(&reviews))?;
        }
        Command::Related { id } => {
            let cards = ProductController::new(client, ItemId(id)).related().await.unwrap_or_default();
            write!(out, "{}", render::product_list(&cards, "No similar items"))?;
        }
        Command::Review { id, rating, text } => {
            let product = ProductController::new(client, ItemId(id));
            if let Some(warning) = product.open_review_form() {
                return Err(anyhow!("{warning}"));
            }
            report(out, product.submit_review(rating, &text).await.notification())?;
        }
        Command::Login { email, password } => {
            let home = HomeController::new(client);
            report(out, &home.login(&email, &password).await)?;
            if let AuthPanel::SignedIn { display_name } = home.panel() {
                writeln!(out, "Hello, {display_name}")?;
            }
        }
        Command::Register {
            name,
            email,
            password,
            phone,
        } => {
            let home = HomeController::new(client);
            report(out, &home.register(&name, &email, &password, &phone).await)?;
        }
        Command::Logout => {
            require_session(&client)?;
            let note = HomeController::new(client).logout().await.context("Sign-out failed")?;
            report(out, &note)?;
        }
        Command::Whoami => match HomeController::new(client).check_auth().await {
            AuthPanel::SignedIn { display_name } => writeln!(out, "{display_name}")?,
            AuthPanel::SignedOut => writeln!(out, "Not signed in")?,
        },
        Command::Cart => {
            require_session(&client)?;
            let view = HomeController::new(client).load_cart().await;
            write!(out, "{}", render::cart(&view))?;
        }
        Command::Add { id, qty } => {
            let outcome = cart::add_item(&client, ItemId(id), qty.max(1)).await;
            report(out, &outcome.notification())?;
        }
        Command::Qty { id, delta } => {
            require_session(&client)?;
            let home = HomeController::new(client);
            home.load_cart().await;
            match home.change_quantity(ItemId(id), delta).await {
                QuantityChange::Updated { quantity } => writeln!(out, "Quantity set to {quantity}")?,
                QuantityChange::Removed(note) | QuantityChange::Failed(note) => report(out, &note)?,
                QuantityChange::NotInCart => bail!("Item #{id} is not in the cart"),
            }
            write!(out, "{}", render::cart(&home.cart_view()))?;
        }
        Command::Remove { id } => {
            require_session(&client)?;
            report(out, &HomeController::new(client).remove(ItemId(id)).await)?;
        }
        Command::Clear { yes } => {
            require_session(&client)?;
            let home = HomeController::new(client);
            home.load_cart().await;
            match home.clear(|| yes).await {
                Some(note) => report(out, &note)?,
                None if !yes => bail!("Pass --yes to clear the cart"),
                None => writeln!(out, "Cart is empty")?,
            }
        }
        Command::Compare { id } => {
            report(out, &compare::add_to_comparison(&client, ItemId(id)).await)?;
        }
        Command::Comparison { id } => {
            require_session(&client)?;
            let id = match id {
                Some(id) => id,
                None => client
                    .comparisons()
                    .await?
                    .first()
                    .map(|c| c.id)
                    .context("No comparisons yet")?,
            };
            let detail = client.comparison(id).await?;
            write!(out, "{}", render::comparison(&ComparisonTable::from(&detail)))?;
        }
    }
    Ok(())
}
