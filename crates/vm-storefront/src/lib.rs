//! DOM-free page logic for the VoltMarket storefront.
//!
//! Each page controller owns only its own state and talks to the backend
//! through an injected [`vm_client::ApiClient`]. Controllers return view
//! models; [`html`] turns those into markup.

pub mod cards;
pub mod cart;
pub mod catalog;
pub mod compare;
pub mod filters;
pub mod format;
pub mod home;
pub mod html;
pub mod notify;
pub mod pagination;
pub mod product;
pub mod stars;

pub use cards::{CategoryCard, FilterOption, ProductCard};
pub use cart::{CartAdd, CartMirror, CartView};
pub use catalog::{CatalogController, CatalogResults, CatalogView};
pub use compare::ComparisonTable;
pub use filters::{FilterState, SortOption};
pub use home::{AuthPanel, Checkout, HomeController, QuantityChange};
pub use notify::{Notification, Severity};
pub use pagination::PageWindow;
pub use product::{ProductController, ProductPage, ProductView, QuantityStepper, ReviewSubmission, ReviewsView};
pub use stars::{Star, StarRating};
