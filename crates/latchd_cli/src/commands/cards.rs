//! Card management commands.

use latchd_core::{AddOutcome, CardStore, CoreResult};
use tracing::debug;

/// Shows the authorization list as a table.
pub fn list(store: &CardStore) {
    let file = store.load();
    println!();
    println!("--- Authorized cards ---");
    println!("{:<15} {:<20} {:<10}", "Card ID", "Name", "Status");
    println!("{}", "-".repeat(45));
    for card in &file.cards {
        let status = if card.authorized { "Authorized" } else { "Denied" };
        println!("{:<15} {:<20} {:<10}", card.id, card.name, status);
    }
}

/// Adds a new card record; a duplicate identifier is reported, not an error.
pub fn add(store: &CardStore, card_id: &str, name: &str, authorized: bool) -> CoreResult<()> {
    debug!(card_id, name, authorized, path = %store.path().display(), "adding card");
    match store.add(card_id, name, authorized)? {
        AddOutcome::Added => {
            let status = if authorized { "Authorized" } else { "Denied" };
            println!("Card added: {card_id} - {name} ({status})");
        }
        AddOutcome::AlreadyExists => println!("Card {card_id} already exists!"),
    }
    Ok(())
}

/// Deletes a card record.
pub fn delete(store: &CardStore, card_id: &str) -> CoreResult<()> {
    debug!(card_id, path = %store.path().display(), "deleting card");
    if store.remove(card_id)? {
        println!("Card deleted: {card_id}");
    } else {
        println!("Card {card_id} not found!");
    }
    Ok(())
}

/// Updates an existing card's authorization flag.
pub fn update(store: &CardStore, card_id: &str, authorized: bool) -> CoreResult<()> {
    debug!(card_id, authorized, path = %store.path().display(), "updating card");
    if store.set_authorized(card_id, authorized)? {
        let status = if authorized { "Authorized" } else { "Denied" };
        println!("Card updated {card_id}: {status}");
    } else {
        println!("Card {card_id} not found!");
    }
    Ok(())
}

/// Seeds the default card set if no intact list exists.
pub fn init(store: &CardStore) -> CoreResult<()> {
    let file = store.ensure_default()?;
    println!(
        "Card store ready at {} ({} records)",
        store.path().display(),
        file.cards.len()
    );
    Ok(())
}
