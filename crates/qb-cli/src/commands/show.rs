use colored::Colorize;
use qb_client::CharacterApi;
use qb_core::{Attribute, Character};

use super::Context;

pub async fn run(ctx: &Context) -> Result<(), String> {
    let id = ctx.store.require_selected().map_err(|e| e.to_string())?;
    let character = ctx
        .api()?
        .fetch_character(id)
        .await
        .map_err(|e| format!("cannot load character {id}: {e}"))?;

    print!("{}", render_sheet(&character));
    Ok(())
}

fn render_sheet(c: &Character) -> String {
    let s = &c.status;
    let mut out = String::new();

    out.push_str(&format!(
        "  {} {}\n",
        c.name.bold(),
        format!("[level {}]", c.level).dimmed()
    ));
    if !c.image.is_empty() && !c.image.starts_with("data:") {
        out.push_str(&format!("  {}\n", c.image.dimmed()));
    }
    out.push('\n');

    out.push_str(&format!(
        "  experience: {}/{}\n",
        c.experience, c.experience_next_level
    ));
    out.push_str(&format!("  coins:      {}\n", c.coins));
    out.push_str(&format!("  created:    {}\n", super::list::created_on(c)));
    out.push_str(&format!(
        "  health:     {}/{} (+{}/tick)\n",
        s.health, s.max_health, s.health_regen
    ));
    out.push_str(&format!(
        "  mana:       {}/{} (+{}/tick)\n",
        s.mana, s.max_mana, s.mana_regen
    ));
    out.push('\n');

    for attr in Attribute::ALL {
        out.push_str(&format!(
            "  {:<11} {}\n",
            format!("{}:", attr.name()),
            attr.get(s)
        ));
    }
    out.push('\n');

    out.push_str(&format!("  damage:     {}-{}\n", s.damage, s.max_damage));
    out.push_str(&format!("  speed:      {:.2}\n", s.attack_speed));
    out.push_str(&format!(
        "  defence:    {} melee, {} magic\n",
        s.melee_defence, s.magic_defence
    ));
    out.push_str(&format!("  evasion:    {:.2}\n", s.evasion));
    out.push_str(&format!("  critical:   x{:.2}\n", s.critical_damage));

    if c.available_attribute_points > 0 {
        out.push('\n');
        out.push_str(&format!(
            "  {} unspent attribute point{}; spend them with `qb allocate` or `qb train`\n",
            c.available_attribute_points.to_string().yellow(),
            super::plural(c.available_attribute_points)
        ));
    }
    out
}
