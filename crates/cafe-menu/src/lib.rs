//! Menu item operations for the cafe console client.
//!
//! Searches and mutations on the `Menu` table. Item names are not unique,
//! so updates and deletes affect every row sharing the given name; each
//! mutation returns the number of rows it touched so callers can surface
//! that.
//!
//! Searches render prices in SQL with two decimals, so a price stored as
//! `3.5` comes back as `3.50`.

use std::io::Write;

use cafe_db::{params, Database, DbError};
use cafe_types::{ItemUpdate, NewMenuItem};
use thiserror::Error;

/// Errors that can occur during menu operations.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("item name cannot be empty")]
    EmptyName,
}

const SELECT_BY_NAME: &str = "SELECT itemName, type, printf('%.2f', price) AS price, description, imageURL
     FROM Menu WHERE itemName = ?1 ORDER BY rowid";

const SELECT_BY_TYPE: &str = "SELECT itemName, type, printf('%.2f', price) AS price, description, imageURL
     FROM Menu WHERE type = ?1 ORDER BY itemName, rowid";

/// Returns every item named `name`, one row per item.
pub fn find_items_by_name(db: &Database, name: &str) -> Result<Vec<Vec<String>>, MenuError> {
    Ok(db.execute_query_and_return_result(SELECT_BY_NAME, [name])?)
}

/// Returns every item of type `item_type`, ordered by name.
pub fn find_items_by_type(db: &Database, item_type: &str) -> Result<Vec<Vec<String>>, MenuError> {
    Ok(db.execute_query_and_return_result(SELECT_BY_TYPE, [item_type])?)
}

/// Prints every item named `name` with a header line; returns the count.
pub fn print_items_by_name<W: Write + ?Sized>(
    db: &Database,
    name: &str,
    out: &mut W,
) -> Result<usize, MenuError> {
    Ok(db.execute_query_and_print_result(SELECT_BY_NAME, [name], out)?)
}

/// Prints every item of type `item_type` with a header line; returns the count.
pub fn print_items_by_type<W: Write + ?Sized>(
    db: &Database,
    item_type: &str,
    out: &mut W,
) -> Result<usize, MenuError> {
    Ok(db.execute_query_and_print_result(SELECT_BY_TYPE, [item_type], out)?)
}

/// Counts the items named `name`.
pub fn count_items_by_name(db: &Database, name: &str) -> Result<usize, MenuError> {
    Ok(db.execute_query("SELECT 1 FROM Menu WHERE itemName = ?1", [name])?)
}

/// Adds one item to the menu.
pub fn add_item(db: &Database, item: &NewMenuItem) -> Result<(), MenuError> {
    if item.item_name.trim().is_empty() {
        return Err(MenuError::EmptyName);
    }

    db.execute_update(
        "INSERT INTO Menu (itemName, type, price, description, imageURL) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            item.item_name,
            item.item_type,
            item.price.amount(),
            item.description,
            item.image_url,
        ],
    )?;

    tracing::info!(item = %item.item_name, price = %item.price, "menu item added");
    Ok(())
}

/// Deletes every item named `name`; returns how many were removed.
pub fn delete_items(db: &Database, name: &str) -> Result<usize, MenuError> {
    let removed = db.execute_update("DELETE FROM Menu WHERE itemName = ?1", [name])?;
    tracing::info!(item = name, removed, "menu items deleted");
    Ok(removed)
}

/// Applies `update` to every item named `name`; returns how many changed.
pub fn update_items(db: &Database, name: &str, update: &ItemUpdate) -> Result<usize, MenuError> {
    let sql = format!("UPDATE Menu SET {} = ?1 WHERE itemName = ?2", update.column());
    let updated = match update {
        ItemUpdate::Name(value) => {
            if value.trim().is_empty() {
                return Err(MenuError::EmptyName);
            }
            db.execute_update(&sql, params![value, name])?
        }
        ItemUpdate::Type(value) | ItemUpdate::Description(value) | ItemUpdate::ImageUrl(value) => {
            db.execute_update(&sql, params![value, name])?
        }
        ItemUpdate::Price(price) => db.execute_update(&sql, params![price.amount(), name])?,
    };

    tracing::info!(item = name, column = update.column(), updated, "menu items updated");
    Ok(updated)
}
