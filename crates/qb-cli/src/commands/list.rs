use comfy_table::{ContentArrangement, Table};
use qb_client::CharacterApi;
use qb_core::Character;

use super::Context;

pub async fn run(ctx: &Context) -> Result<(), String> {
    let claims = ctx.store.claims().map_err(|e| e.to_string())?;
    let mut characters = ctx
        .api()?
        .list_characters(claims.id)
        .await
        .map_err(|e| format!("cannot load characters: {e}"))?;

    if characters.is_empty() {
        println!("  No characters yet. Create one with: qb create <name>");
        return Ok(());
    }

    characters.sort_by_key(|c| c.id);
    let selected = ctx.store.selected_character();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "", "ID", "Name", "Level", "XP", "Points", "Coins", "Created",
    ]);

    for c in &characters {
        let marker = if Some(c.id) == selected { "*" } else { "" };
        table.add_row(vec![
            marker.to_string(),
            c.id.to_string(),
            c.name.clone(),
            c.level.to_string(),
            format!("{}/{}", c.experience, c.experience_next_level),
            c.available_attribute_points.to_string(),
            c.coins.to_string(),
            created_on(c),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", characters.len());

    Ok(())
}

/// Creation date as `YYYY-MM-DD`, or a dash when the server sent none.
pub(super) fn created_on(c: &Character) -> String {
    c.create_at
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d").to_string())
}
