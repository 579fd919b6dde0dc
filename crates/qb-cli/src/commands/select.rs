use qb_core::CharacterId;

use super::Context;

pub fn run(ctx: &mut Context, id: u64) -> Result<(), String> {
    let id = CharacterId(id);
    ctx.store
        .select_character(id)
        .map_err(|e| e.to_string())?;
    println!("  Selected character {id}.");
    Ok(())
}
