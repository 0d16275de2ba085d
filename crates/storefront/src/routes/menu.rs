//! Menu page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;
use warung_core::MenuItem;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Menu item display data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub handle: String,
    pub name: String,
    pub price: String,
    pub description: Option<String>,
}

impl From<&MenuItem> for MenuItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            handle: item.handle.clone(),
            name: item.name.clone(),
            price: item.price.to_string(),
            description: item.description.clone(),
        }
    }
}

/// A menu heading with its items.
#[derive(Clone)]
pub struct MenuSection {
    pub title: String,
    pub items: Vec<MenuItemView>,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/index.html")]
pub struct MenuTemplate {
    pub store_name: String,
    pub sections: Vec<MenuSection>,
    pub cart_count: u64,
    pub revision: u64,
}

/// Display the menu.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<MenuTemplate> {
    let sections = state
        .catalog()
        .by_category()
        .into_iter()
        .map(|(title, items)| MenuSection {
            title: title.to_string(),
            items: items.into_iter().map(MenuItemView::from).collect(),
        })
        .collect();
    let cart_count = state.cart()?.cart().item_count();

    Ok(MenuTemplate {
        store_name: state.config().store_name.clone(),
        sections,
        cart_count,
        revision: state.cart_revision(),
    })
}
