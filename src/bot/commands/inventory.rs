//! Inventory Discord commands - `/inventory add|list|edit|delete|low`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::unknown_choice,
            handlers::autocomplete::{self, parse_record_id},
            reply_error, views,
        },
        core::{
            inventory::{self, ItemInput},
            report::format_currency,
            storage::CollectionKey,
        },
        errors::Result,
    };
    use std::fmt::Write;

    /// Parent command for parts on hand.
    #[poise::command(
        slash_command,
        subcommands(
            "inventory_add",
            "inventory_list",
            "inventory_edit",
            "inventory_delete",
            "inventory_low"
        )
    )]
    pub async fn inventory(ctx: Context<'_>) -> Result<()> {
        let help_text = "Inventory commands. Available subcommands:\n\
            `/inventory add` - Add a new part\n\
            `/inventory list` - List or search parts\n\
            `/inventory edit` - Change a part's name, prices or minimum stock\n\
            `/inventory delete` - Delete a part\n\
            `/inventory low` - Parts at or below minimum stock";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new part to inventory.
    #[poise::command(slash_command, rename = "add")]
    pub async fn inventory_add(
        ctx: Context<'_>,
        #[description = "Part name (e.g., 'HP 85A Toner')"] name: String,
        #[description = "Units on hand"] quantity: u32,
        #[description = "Purchase price per unit"] cost_price: f64,
        #[description = "Price charged per unit"] sell_price: f64,
        #[description = "Warn when stock falls to this level. Defaults to 0."] min_stock: Option<
            u32,
        >,
    ) -> Result<()> {
        let input = ItemInput {
            name,
            cost_price,
            sell_price,
            min_stock: min_stock.unwrap_or(0),
        };

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let item = match inventory::create_item(&mut state, input, quantity) {
            Ok(item) => item,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Inventory).await?;
        drop(state);

        ctx.say(format!(
            "✅ Part **#{}** '{}' added: {} on hand, sells for {}.",
            item.id,
            item.name,
            item.quantity,
            format_currency(item.sell_price)
        ))
        .await?;
        Ok(())
    }

    /// Lists parts, optionally filtered by name.
    #[poise::command(slash_command, rename = "list")]
    pub async fn inventory_list(
        ctx: Context<'_>,
        #[description = "Text to search for"] search: Option<String>,
    ) -> Result<()> {
        let text = {
            let state = ctx.data().state.lock().await;
            let items = inventory::search_items(&state, search.as_deref().unwrap_or_default());
            let mut out = String::new();
            if !items.is_empty() {
                let _ = writeln!(out, "**Inventory ({})**", items.len());
                for item in items {
                    let _ = writeln!(out, "{}", views::item_line(item));
                }
            }
            out
        };

        if text.is_empty() {
            ctx.say("📦 No parts found. Add one with `/inventory add`.")
                .await?;
        } else {
            ctx.say(views::truncate_message(&text, views::MAX_MESSAGE_LEN))
                .await?;
        }
        Ok(())
    }

    /// Edits a part's catalogue fields. Stock on hand only changes through orders.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn inventory_edit(
        ctx: Context<'_>,
        #[description = "Part"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        item: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New purchase price per unit"] cost_price: Option<f64>,
        #[description = "New price charged per unit"] sell_price: Option<f64>,
        #[description = "New minimum stock"] min_stock: Option<u32>,
    ) -> Result<()> {
        let Some(item_id) = parse_record_id(&item) else {
            return unknown_choice(ctx, "part", &item).await;
        };

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let Some(current) = state.item(item_id).cloned() else {
            drop(state);
            ctx.say(format!("❌ Inventory item #{item_id} not found")).await?;
            return Ok(());
        };

        let input = ItemInput {
            name: name.unwrap_or(current.name),
            cost_price: cost_price.unwrap_or(current.cost_price),
            sell_price: sell_price.unwrap_or(current.sell_price),
            min_stock: min_stock.unwrap_or(current.min_stock),
        };
        let updated = match inventory::update_item(&mut state, item_id, input) {
            Ok(item) => item,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Inventory).await?;
        drop(state);

        ctx.say(format!("✅ Part updated:\n{}", views::item_line(&updated)))
            .await?;
        Ok(())
    }

    /// Deletes a part. Orders that used it keep their recorded prices.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn inventory_delete(
        ctx: Context<'_>,
        #[description = "Part"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        item: String,
        #[description = "Set to true to confirm the deletion"] confirm: bool,
    ) -> Result<()> {
        let Some(item_id) = parse_record_id(&item) else {
            return unknown_choice(ctx, "part", &item).await;
        };
        if !confirm {
            ctx.say(format!(
                "⚠️ Part #{item_id} was not deleted. Run the command again with `confirm: True`."
            ))
            .await?;
            return Ok(());
        }

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let removed = match inventory::delete_item(&mut state, item_id) {
            Ok(item) => item,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Inventory).await?;
        drop(state);

        ctx.say(format!("🗑️ Part #{} '{}' deleted.", removed.id, removed.name))
            .await?;
        Ok(())
    }

    /// Lists parts at or below their minimum stock.
    #[poise::command(slash_command, rename = "low")]
    pub async fn inventory_low(ctx: Context<'_>) -> Result<()> {
        let text = {
            let state = ctx.data().state.lock().await;
            let mut out = String::new();
            for item in inventory::low_stock_items(&state) {
                let _ = writeln!(out, "{}", views::item_line(item));
            }
            out
        };

        if text.is_empty() {
            ctx.say("✅ All parts are above their minimum stock.").await?;
        } else {
            ctx.say(views::truncate_message(
                &format!("**⚠️ Low stock**\n{text}"),
                views::MAX_MESSAGE_LEN,
            ))
            .await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
